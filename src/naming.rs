//! Naming convention shared by the generator and the catalog.
//!
//! The catalog never looks inside the derived directories, it predicts the
//! names the generator will write. Both sides must go through this module.

use std::fmt;

use crate::error::{GalleryError, Result};

/// Every derivative is written in this format, whatever the source format was.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Tag used for the fixed-height thumbnail.
pub const THUMB_TAG: &str = "thumb";

/// Which derivative of a source image a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantTag {
    Thumb,
    /// A resize tier, keyed by its nominal width (not the clamped one).
    Width(u32),
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantTag::Thumb => f.write_str(THUMB_TAG),
            VariantTag::Width(width) => write!(f, "{}", width),
        }
    }
}

/// Filename without its final extension ("cat.jpg" -> "cat").
pub fn display_name(filename: &str) -> &str {
    match filename.rfind('.') {
        // a leading dot is a hidden file, not an extension
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    }
}

/// Replace the extension of `filename` with `_<tag>` and append the output
/// extension: `derive_name("cat.png", "thumb") == "cat_thumb.jpg"`.
///
/// The source extension is dropped, so "cat.jpg" and "cat.png" map to the
/// same derivative names and share one set of derivatives on disk.
pub fn derive_name(filename: &str, tag: impl fmt::Display) -> String {
    format!("{}_{}.{}", display_name(filename), tag, OUTPUT_EXTENSION)
}

/// Source images are addressed by bare filename inside one flat directory.
/// Reject anything that could escape it.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0'])
    {
        return Err(GalleryError::InvalidArgument(format!(
            "not a plain filename: {:?}",
            filename
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_thumb_and_width() {
        assert_eq!(derive_name("cat.jpg", "thumb"), "cat_thumb.jpg");
        assert_eq!(derive_name("cat.jpg", "800"), "cat_800.jpg");
        assert_eq!(derive_name("cat.jpg", VariantTag::Width(800)), "cat_800.jpg");
        assert_eq!(derive_name("cat.jpg", VariantTag::Thumb), "cat_thumb.jpg");
    }

    #[test]
    fn test_output_extension_ignores_source_format() {
        assert_eq!(derive_name("Beach.PNG", VariantTag::Thumb), "Beach_thumb.jpg");
        assert_eq!(derive_name("Beach.JPG", VariantTag::Width(400)), "Beach_400.jpg");
    }

    #[test]
    fn test_sources_differing_by_extension_share_derivatives() {
        assert_eq!(derive_name("cat.jpg", VariantTag::Thumb), derive_name("cat.png", VariantTag::Thumb));
        assert_eq!(derive_name("cat.jpg", VariantTag::Width(400)), derive_name("cat.PNG", VariantTag::Width(400)));
    }

    #[test]
    fn test_only_last_extension_is_replaced() {
        assert_eq!(derive_name("my.holiday.png", "thumb"), "my.holiday_thumb.jpg");
        assert_eq!(display_name("my.holiday.png"), "my.holiday");
    }

    #[test]
    fn test_names_without_extension() {
        assert_eq!(display_name("README"), "README");
        assert_eq!(derive_name("README", "thumb"), "README_thumb.jpg");
        assert_eq!(display_name(".hidden"), ".hidden");
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("cat.jpg").is_ok());
        assert!(validate_filename("holiday photo.PNG").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("../secret.jpg").is_err());
        assert!(validate_filename("dir\\cat.jpg").is_err());
    }
}
