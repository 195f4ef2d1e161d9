/// Derivative generation module
///
/// This module handles:
/// - Naming and locating derivatives, decoding and encoding (generator.rs)
/// - The existence check used as the cache key (cache.rs)
/// - Fixed-height thumbnails (thumbnail.rs)
/// - Width-capped resize tiers, fanned out over the blocking pool (processor.rs)
/// - Removing derivatives alongside their source (cleanup.rs)

pub mod cache;
pub mod cleanup;
pub mod generator;
pub mod processor;
pub mod thumbnail;

pub use cache::{DerivativeCache, FsCache};
pub use generator::Generator;
pub use processor::{SizesReport, TierOutcome, TierStatus};
pub use thumbnail::{render_thumbnail, ThumbnailOutcome};
