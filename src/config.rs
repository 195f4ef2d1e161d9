//! Gallery configuration
//!
//! Describes where source images live, where derivatives are written and
//! which sizes get produced. Stored as JSON so the web layer and the CLI
//! can share one file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GalleryError, Result};

/// Fixed output height of thumbnails
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 200;

/// Nominal widths of the resize tiers (ascending)
pub const DEFAULT_RESIZE_WIDTHS: [u32; 5] = [400, 600, 800, 1000, 1200];

/// Accepted source extensions, tried in this order when resolving a name
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".jpg", ".JPG", ".png", ".PNG"];

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_GRID_WIDTH: usize = 4;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// Flat directory holding the uploaded originals
    pub source_dir: PathBuf,
    /// Output directory for `<base>_thumb.jpg`
    pub thumbnail_dir: PathBuf,
    /// Output directory for `<base>_<width>.jpg`
    pub resized_dir: PathBuf,
    /// Accepted filename extensions, dot included
    pub extensions: Vec<String>,
    pub thumbnail_height: u32,
    pub resize_widths: Vec<u32>,
    pub page_size: usize,
    pub grid_width: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::with_root(Self::default_root())
    }
}

impl GalleryConfig {
    /// Lay out the three directories under one root:
    /// `<root>/images`, `<root>/thumbnails`, `<root>/resized`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            source_dir: root.join("images"),
            thumbnail_dir: root.join("thumbnails"),
            resized_dir: root.join("resized"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
            resize_widths: DEFAULT_RESIZE_WIDTHS.to_vec(),
            page_size: DEFAULT_PAGE_SIZE,
            grid_width: DEFAULT_GRID_WIDTH,
        }
    }

    /// Get the default gallery root
    /// - Linux: ~/.local/share/photo-gallery
    /// - macOS: ~/Library/Application Support/photo-gallery
    /// - Windows: %APPDATA%\photo-gallery
    fn default_root() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("photo-gallery");
        path
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON string; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thumbnail_height == 0 {
            return Err(GalleryError::InvalidArgument(
                "thumbnail_height must be positive".into(),
            ));
        }
        if self.resize_widths.is_empty() || self.resize_widths.contains(&0) {
            return Err(GalleryError::InvalidArgument(
                "resize_widths must be a non-empty list of positive widths".into(),
            ));
        }
        if self.resize_widths.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(GalleryError::InvalidArgument(
                "resize_widths must be strictly ascending".into(),
            ));
        }
        if self.page_size == 0 || self.grid_width == 0 {
            return Err(GalleryError::InvalidArgument(
                "page_size and grid_width must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Create the source and output directories if they don't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.source_dir, &self.thumbnail_dir, &self.resized_dir] {
            fs::create_dir_all(dir).map_err(|e| GalleryError::io(dir, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_layout() {
        let config = GalleryConfig::with_root("/srv/gallery");
        assert_eq!(config.source_dir, PathBuf::from("/srv/gallery/images"));
        assert_eq!(config.thumbnail_dir, PathBuf::from("/srv/gallery/thumbnails"));
        assert_eq!(config.resized_dir, PathBuf::from("/srv/gallery/resized"));
        assert_eq!(config.resize_widths, vec![400, 600, 800, 1000, 1200]);
        assert_eq!(config.thumbnail_height, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GalleryConfig::from_json(r#"{ "source_dir": "/tmp/pics", "page_size": 8 }"#)
            .unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/tmp/pics"));
        assert_eq!(config.page_size, 8);
        assert_eq!(config.grid_width, DEFAULT_GRID_WIDTH);
        assert_eq!(config.extensions.len(), 4);
    }

    #[test]
    fn test_serialization() {
        let mut config = GalleryConfig::with_root("/data");
        config.grid_width = 6;

        let json = config.to_json().unwrap();
        let restored = GalleryConfig::from_json(&json).unwrap();

        assert_eq!(config, restored);
    }

    #[test]
    fn test_rejects_unsorted_tiers() {
        let err = GalleryConfig::from_json(r#"{ "resize_widths": [800, 400] }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = GalleryConfig::from_json(r#"{ "page_size": 0 }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_ensure_dirs_creates_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GalleryConfig::with_root(tmp.path().join("gallery"));

        config.ensure_dirs().unwrap();

        assert!(config.source_dir.is_dir());
        assert!(config.thumbnail_dir.is_dir());
        assert!(config.resized_dir.is_dir());
    }
}
