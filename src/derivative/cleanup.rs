use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use super::generator::Generator;
use crate::error::{GalleryError, Result};

/// Remove a file, treating "already gone" as success.
/// Returns whether something was deleted.
fn remove_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(GalleryError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

impl Generator {
    /// Delete the thumbnail and every resize tier of `filename`.
    /// Missing derivatives are skipped; returns the paths that were removed.
    ///
    /// Derivative names ignore the source extension, so this also removes
    /// what "cat.png" shares with a sibling "cat.jpg".
    pub fn remove_derivatives(&self, filename: &str) -> Result<Vec<PathBuf>> {
        self.source_path(filename)?;

        let targets = std::iter::once(self.thumbnail_path(filename)).chain(
            self.config
                .resize_widths
                .iter()
                .map(|&width| self.resized_path(filename, width)),
        );

        let mut removed = Vec::new();
        for path in targets {
            if remove_if_present(&path)? {
                removed.push(path);
            }
        }

        Ok(removed)
    }

    /// Delete a source image along with its derivatives.
    ///
    /// Derivatives go first so nothing is left behind that still looks
    /// cached for a later upload reusing the same filename.
    pub fn remove_image(&self, filename: &str) -> Result<Vec<PathBuf>> {
        let source = self.existing_source(filename)?;

        let mut removed = self.remove_derivatives(filename)?;
        if !remove_if_present(&source)? {
            return Err(GalleryError::NotFound(source));
        }
        removed.push(source);

        info!(filename, removed = removed.len(), "image deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::derivative::testing::{fixture, write_image};
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_remove_image_clears_every_derivative() {
        let (_tmp, generator) = fixture();
        write_image(&generator.config().source_dir.join("cat.jpg"), 1200, 600);
        generator.generate_thumbnail("cat.jpg").await.unwrap();
        generator.generate_all_sizes("cat.jpg").await.unwrap();

        let removed = generator.remove_image("cat.jpg").unwrap();

        assert_eq!(removed.len(), 7);
        assert!(!generator.config().source_dir.join("cat.jpg").exists());
        assert!(!generator.thumbnail_path("cat.jpg").exists());
        assert!(!generator.resized_path("cat.jpg", 1200).exists());
    }

    #[test]
    fn test_remove_derivatives_skips_missing_files() {
        let (_tmp, generator) = fixture();
        std::fs::write(generator.thumbnail_path("dog.png"), b"jpeg").unwrap();

        let removed = generator.remove_derivatives("dog.png").unwrap();

        assert_eq!(removed, vec![generator.thumbnail_path("dog.png")]);
        assert!(generator.remove_derivatives("dog.png").unwrap().is_empty());
    }

    #[test]
    fn test_remove_missing_image_is_not_found() {
        let (_tmp, generator) = fixture();
        let err = generator.remove_image("ghost.jpg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
