//! Derivative generation and catalog indexing for a personal photo gallery.
//!
//! Two independent parts share only the source directory on disk:
//! - [`Generator`] writes thumbnails and resize tiers, skipping anything
//!   already there
//! - [`Catalog`] lists, pages, searches and grids the source images,
//!   predicting derivative names with the same [`naming`] rules
//!
//! Routing, sessions, HTML and upload parsing live in the web layer on top.

pub mod catalog;
pub mod config;
pub mod derivative;
pub mod error;
pub mod naming;

pub use catalog::{partition_grid, Catalog, CatalogEntry, Grid, SearchResults};
pub use config::GalleryConfig;
pub use derivative::{
    DerivativeCache, FsCache, Generator, SizesReport, ThumbnailOutcome, TierOutcome, TierStatus,
};
pub use error::{ErrorKind, GalleryError, Result};
pub use naming::{derive_name, display_name, VariantTag};
