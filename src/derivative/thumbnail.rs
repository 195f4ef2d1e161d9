use image::{imageops::FilterType, DynamicImage};
use std::path::PathBuf;
use tokio::task;
use tracing::{debug, warn};

use super::generator::{load_source, save_jpeg, scaled_width, Generator};
use crate::error::Result;

/// What `generate_thumbnail` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// Written by this call
    Generated(PathBuf),
    /// Already present, nothing written
    Cached(PathBuf),
}

impl ThumbnailOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Generated(path) | Self::Cached(path) => path,
        }
    }
}

/// Scale `img` to exactly `height` pixels tall, width following the aspect ratio
pub fn render_thumbnail(img: &DynamicImage, height: u32) -> DynamicImage {
    let width = scaled_width(img.width(), img.height(), height);
    img.resize_exact(width, height, FilterType::Lanczos3)
}

impl Generator {
    /// Generate the fixed-height thumbnail for a source image.
    ///
    /// No-op when `<base>_thumb.jpg` already exists. Missing sources and
    /// undecodable files are errors; decoding and encoding run on the
    /// blocking pool.
    pub async fn generate_thumbnail(&self, filename: &str) -> Result<ThumbnailOutcome> {
        let source = self.existing_source(filename)?;
        let target = self.thumbnail_path(filename);

        if self.cache.derivative_exists(&target) {
            debug!(filename, "thumbnail already cached");
            return Ok(ThumbnailOutcome::Cached(target));
        }

        let height = self.config.thumbnail_height;
        let outcome = task::spawn_blocking(move || {
            let img = load_source(&source)?;
            let thumbnail = render_thumbnail(&img, height);
            save_jpeg(&thumbnail, &target)?;
            Ok::<_, crate::error::GalleryError>(ThumbnailOutcome::Generated(target))
        })
        .await??;

        debug!(filename, path = %outcome.path().display(), "generated thumbnail");
        Ok(outcome)
    }

    /// Thumbnail every file in `filenames`, one after the other.
    /// A failing file is logged and reported; the rest still get processed.
    pub async fn generate_thumbnails_for<I>(
        &self,
        filenames: I,
    ) -> Vec<(String, Result<ThumbnailOutcome>)>
    where
        I: IntoIterator<Item = String>,
    {
        let mut results = Vec::new();

        for filename in filenames {
            let result = self.generate_thumbnail(&filename).await;
            if let Err(err) = &result {
                warn!(filename = %filename, error = %err, "thumbnail generation failed");
            }
            results.push((filename, result));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivative::testing::{fixture, fixture_with_cache, write_image, AlwaysCached};
    use crate::error::ErrorKind;
    use std::fs;

    #[tokio::test]
    async fn test_thumbnail_is_200_high_and_keeps_aspect() {
        let (_tmp, generator) = fixture();
        write_image(&generator.config().source_dir.join("wide.jpg"), 800, 400);

        let outcome = generator.generate_thumbnail("wide.jpg").await.unwrap();

        assert!(matches!(outcome, ThumbnailOutcome::Generated(_)));
        assert!(outcome.path().ends_with("wide_thumb.jpg"));
        assert_eq!(image::image_dimensions(outcome.path()).unwrap(), (400, 200));
    }

    #[tokio::test]
    async fn test_png_with_alpha_becomes_jpeg() {
        let (_tmp, generator) = fixture();
        let source = generator.config().source_dir.join("logo.PNG");
        image::RgbaImage::new(300, 600).save_with_format(&source, image::ImageFormat::Png).unwrap();

        let outcome = generator.generate_thumbnail("logo.PNG").await.unwrap();

        assert!(outcome.path().ends_with("logo_thumb.jpg"));
        assert_eq!(image::image_dimensions(outcome.path()).unwrap(), (100, 200));
    }

    #[tokio::test]
    async fn test_second_call_is_a_no_op() {
        let (_tmp, generator) = fixture();
        write_image(&generator.config().source_dir.join("cat.jpg"), 640, 480);

        let first = generator.generate_thumbnail("cat.jpg").await.unwrap();
        let bytes = fs::read(first.path()).unwrap();
        let modified = fs::metadata(first.path()).unwrap().modified().unwrap();

        let second = generator.generate_thumbnail("cat.jpg").await.unwrap();

        assert_eq!(second, ThumbnailOutcome::Cached(first.path().clone()));
        assert_eq!(fs::read(second.path()).unwrap(), bytes);
        assert_eq!(fs::metadata(second.path()).unwrap().modified().unwrap(), modified);
    }

    #[tokio::test]
    async fn test_errors_are_surfaced() {
        let (_tmp, generator) = fixture();
        fs::write(generator.config().source_dir.join("broken.jpg"), b"garbage bytes that are not an image").unwrap();

        let err = generator.generate_thumbnail("broken.jpg").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(!generator.thumbnail_path("broken.jpg").exists());

        let err = generator.generate_thumbnail("ghost.jpg").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cache_decides_what_is_skipped() {
        let (_tmp, generator) = fixture_with_cache(AlwaysCached);
        write_image(&generator.config().source_dir.join("cat.jpg"), 64, 64);

        let outcome = generator.generate_thumbnail("cat.jpg").await.unwrap();

        assert!(matches!(outcome, ThumbnailOutcome::Cached(_)));
        assert!(!outcome.path().exists());
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let (_tmp, generator) = fixture();
        let dir = generator.config().source_dir.clone();
        write_image(&dir.join("a.jpg"), 100, 100);
        fs::write(dir.join("b.jpg"), b"garbage bytes that are not an image").unwrap();
        write_image(&dir.join("c.png"), 50, 100);

        let results = generator
            .generate_thumbnails_for(["a.jpg", "b.jpg", "c.png"].map(String::from))
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_ok());
        assert!(generator.thumbnail_path("c.png").is_file());
    }
}
