/// Catalog indexing module
///
/// This module turns the source directory into browsable views:
/// - Enumeration, pagination, search and name resolution (library.rs)
/// - View objects and grid partitioning (data.rs)

pub mod library;
pub mod data;

pub use data::{partition_grid, CatalogEntry, Grid, SearchResults};
pub use library::Catalog;
