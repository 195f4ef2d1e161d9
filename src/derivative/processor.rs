//! Resize tiers
//!
//! Every source gets one width-capped copy per configured tier
//! (400/600/800/1000/1200 by default):
//! - the file is named after the nominal tier width
//! - the pixels never exceed the source width (no upscaling)
//! - each missing tier is its own blocking task, all sharing one decoded image

use image::{imageops::FilterType, DynamicImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use super::generator::{load_source, save_jpeg, scaled_height, Generator};
use crate::error::{GalleryError, Result};

/// How a single tier ended up
#[derive(Debug)]
pub enum TierStatus {
    Generated,
    Cached,
    Failed(GalleryError),
}

#[derive(Debug)]
pub struct TierOutcome {
    /// Nominal tier width, the one in the filename
    pub width: u32,
    /// Width actually written: `min(width, source width)`
    pub effective_width: u32,
    pub path: PathBuf,
    pub status: TierStatus,
}

/// Result of one `generate_all_sizes` call, one outcome per tier in tier order
#[derive(Debug)]
pub struct SizesReport {
    pub filename: String,
    pub source_width: u32,
    pub tiers: Vec<TierOutcome>,
    pub elapsed: Duration,
}

impl SizesReport {
    pub fn generated(&self) -> usize {
        self.count(|status| matches!(status, TierStatus::Generated))
    }

    pub fn cached(&self) -> usize {
        self.count(|status| matches!(status, TierStatus::Cached))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&TierOutcome, &GalleryError)> {
        self.tiers.iter().filter_map(|tier| match &tier.status {
            TierStatus::Failed(err) => Some((tier, err)),
            _ => None,
        })
    }

    /// True when every tier is on disk
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    fn count(&self, pred: impl Fn(&TierStatus) -> bool) -> usize {
        self.tiers.iter().filter(|tier| pred(&tier.status)).count()
    }
}

/// Scale to `width` keeping the aspect ratio and write the tier.
/// A tier as wide as the source is re-encoded without resampling.
fn render_tier(img: &DynamicImage, width: u32, path: &Path) -> Result<()> {
    if width == img.width() {
        return save_jpeg(img, path);
    }

    let height = scaled_height(img.width(), img.height(), width);
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    save_jpeg(&resized, path)
}

enum Pending {
    Done(TierOutcome),
    Running {
        width: u32,
        effective_width: u32,
        path: PathBuf,
        handle: JoinHandle<Result<()>>,
    },
}

impl Generator {
    /// Generate every resize tier of a source image and wait for all of them.
    ///
    /// The source is decoded once. Tiers already on disk are skipped; the
    /// others run concurrently on the blocking pool. A failing tier is logged
    /// and reported in the returned [`SizesReport`] without stopping its
    /// siblings. Only a missing or undecodable source fails the whole call.
    ///
    /// Two callers racing on the same missing tier may both write it; the
    /// output is deterministic so the last write wins harmlessly.
    pub async fn generate_all_sizes(&self, filename: &str) -> Result<SizesReport> {
        let start = Instant::now();
        let source = self.existing_source(filename)?;

        let img = Arc::new(task::spawn_blocking(move || load_source(&source)).await??);
        let source_width = img.width();

        let pending: Vec<Pending> = self
            .config
            .resize_widths
            .iter()
            .map(|&width| {
                let effective_width = width.min(source_width);
                let path = self.resized_path(filename, width);

                if self.cache.derivative_exists(&path) {
                    debug!(filename, width, "tier already cached");
                    return Pending::Done(TierOutcome {
                        width,
                        effective_width,
                        path,
                        status: TierStatus::Cached,
                    });
                }

                let img = Arc::clone(&img);
                let target = path.clone();
                let handle =
                    task::spawn_blocking(move || render_tier(&img, effective_width, &target));

                Pending::Running {
                    width,
                    effective_width,
                    path,
                    handle,
                }
            })
            .collect();

        // Every task is already running; awaiting in tier order only fixes
        // the order of the report.
        let mut tiers = Vec::with_capacity(pending.len());
        for entry in pending {
            let outcome = match entry {
                Pending::Done(outcome) => outcome,
                Pending::Running {
                    width,
                    effective_width,
                    path,
                    handle,
                } => {
                    let status = match handle.await.map_err(GalleryError::from).and_then(|r| r) {
                        Ok(()) => {
                            debug!(filename, width, effective_width, "generated tier");
                            TierStatus::Generated
                        }
                        Err(err) => {
                            warn!(filename, width, error = %err, "tier generation failed");
                            TierStatus::Failed(err)
                        }
                    };
                    TierOutcome {
                        width,
                        effective_width,
                        path,
                        status,
                    }
                }
            };
            tiers.push(outcome);
        }

        let report = SizesReport {
            filename: filename.to_string(),
            source_width,
            tiers,
            elapsed: start.elapsed(),
        };

        info!(
            filename,
            generated = report.generated(),
            cached = report.cached(),
            failed = report.tiers.len() - report.generated() - report.cached(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "resize tiers complete"
        );

        Ok(report)
    }

    /// Start `generate_all_sizes` in the background and return at once.
    ///
    /// Drop the handle to fire and forget (failures still reach the log), or
    /// await it for the report. Must be called from within a tokio runtime.
    pub fn spawn_all_sizes(&self, filename: &str) -> JoinHandle<Result<SizesReport>> {
        let generator = self.clone();
        let filename = filename.to_string();

        tokio::spawn(async move {
            let result = generator.generate_all_sizes(&filename).await;
            if let Err(err) = &result {
                error!(filename = %filename, error = %err, "background resize failed");
            }
            result
        })
    }

    /// Resize a batch of images: every file is started in the background
    /// at once, then the reports are collected in input order. A failing
    /// file never stops the others.
    pub async fn generate_sizes_for<I>(&self, filenames: I) -> Vec<(String, Result<SizesReport>)>
    where
        I: IntoIterator<Item = String>,
    {
        let handles: Vec<(String, JoinHandle<Result<SizesReport>>)> = filenames
            .into_iter()
            .map(|filename| {
                let handle = self.spawn_all_sizes(&filename);
                (filename, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (filename, handle) in handles {
            let result = handle.await.map_err(GalleryError::from).and_then(|r| r);
            results.push((filename, result));
        }

        results
    }
}
