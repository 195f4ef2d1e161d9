use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::cache::{DerivativeCache, FsCache};
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::naming::{derive_name, validate_filename, VariantTag};

/// Computes and persists derivatives of source images.
///
/// Cloning is cheap (two `Arc`s), so a clone can be moved into a spawned
/// task. Existence of the output file is the cache key; see
/// [`DerivativeCache`].
#[derive(Debug, Clone)]
pub struct Generator {
    pub(super) config: Arc<GalleryConfig>,
    pub(super) cache: Arc<dyn DerivativeCache>,
}

impl Generator {
    pub fn new(config: GalleryConfig) -> Self {
        Self::with_cache(config, FsCache)
    }

    pub fn with_cache(config: GalleryConfig, cache: impl DerivativeCache + 'static) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Path of a source image. Fails if `filename` is not a bare filename.
    pub fn source_path(&self, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;
        Ok(self.config.source_dir.join(filename))
    }

    /// Where the thumbnail of `filename` lives (whether or not it exists yet)
    pub fn thumbnail_path(&self, filename: &str) -> PathBuf {
        self.config
            .thumbnail_dir
            .join(derive_name(filename, VariantTag::Thumb))
    }

    /// Where the tier of nominal width `width` lives
    pub fn resized_path(&self, filename: &str, width: u32) -> PathBuf {
        self.config
            .resized_dir
            .join(derive_name(filename, VariantTag::Width(width)))
    }

    /// Resolve the source path and make sure it is there before any
    /// decoding work gets scheduled.
    pub(super) fn existing_source(&self, filename: &str) -> Result<PathBuf> {
        let path = self.source_path(filename)?;
        if !path.is_file() {
            return Err(GalleryError::NotFound(path));
        }
        Ok(path)
    }
}

/// Decode a source image, sniffing the format from its bytes first and
/// falling back to the extension.
pub(super) fn load_source(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| GalleryError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| GalleryError::io(path, e))?;

    reader.decode().map_err(|e| GalleryError::decode(path, e))
}

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Encode `img` as JPEG at `path`.
///
/// The bytes go to a sibling `.part` file first and are renamed into place,
/// so a derivative path never holds a half-written file that the existence
/// check would take for a finished one.
pub(super) fn save_jpeg(img: &DynamicImage, path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let part = path.with_file_name(format!(
        ".{}.{}-{}.part",
        file_name,
        std::process::id(),
        PART_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    if let Err(err) = rgb.save_with_format(&part, ImageFormat::Jpeg) {
        let _ = fs::remove_file(&part);
        return Err(GalleryError::encode(path, err));
    }

    if let Err(err) = fs::rename(&part, path) {
        let _ = fs::remove_file(&part);
        return Err(GalleryError::io(path, err));
    }

    Ok(())
}

/// Height that keeps the aspect ratio of a `width` x `height` image when it
/// is scaled to `new_width`, rounded to the nearest pixel and never zero.
pub(super) fn scaled_height(width: u32, height: u32, new_width: u32) -> u32 {
    scale(height, new_width, width)
}

/// Width that keeps the aspect ratio when scaling to `new_height`.
pub(super) fn scaled_width(width: u32, height: u32, new_height: u32) -> u32 {
    scale(width, new_height, height)
}

fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    let denominator = u64::from(denominator.max(1));
    let scaled = (u64::from(value) * u64::from(numerator) + denominator / 2) / denominator;
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}
