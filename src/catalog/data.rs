//! View objects handed to the web layer
//!
//! These are built fresh for every catalog request and never persisted.

use serde::Serialize;

use crate::error::{GalleryError, Result};
use crate::naming::{derive_name, display_name, VariantTag};

/// Represents a single source image in a catalog listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Filename without extension (e.g., "Jellyfish")
    pub name: String,
    /// Predicted thumbnail filename (e.g., "Jellyfish_thumb.jpg")
    pub thumb: String,
}

impl CatalogEntry {
    pub fn from_filename(filename: &str) -> Self {
        Self {
            name: display_name(filename).to_string(),
            thumb: derive_name(filename, VariantTag::Thumb),
        }
    }
}

/// Matches for one search, plus what is needed to echo
/// "N results for 'query'" back to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub entries: Vec<CatalogEntry>,
    pub count: usize,
    pub query: String,
}

/// Entries split into fixed-width rows for tabular display.
/// The last row may be short; it is never padded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub rows: Vec<Vec<CatalogEntry>>,
}

impl Grid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of entries in each row, in order
    pub fn row_sizes(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }
}

/// Split `entries` into consecutive rows of `width`; the final row holds the
/// remainder. Empty input gives zero rows.
pub fn partition_grid(entries: Vec<CatalogEntry>, width: usize) -> Result<Grid> {
    if width == 0 {
        return Err(GalleryError::InvalidArgument(
            "grid width must be positive".into(),
        ));
    }

    let rows = entries
        .chunks(width)
        .map(|row| row.to_vec())
        .collect();

    Ok(Grid { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn entries(count: usize) -> Vec<CatalogEntry> {
        (0..count)
            .map(|i| CatalogEntry::from_filename(&format!("photo{}.jpg", i)))
            .collect()
    }

    #[test]
    fn test_entry_from_filename() {
        let entry = CatalogEntry::from_filename("Jellyfish.PNG");
        assert_eq!(entry.name, "Jellyfish");
        assert_eq!(entry.thumb, "Jellyfish_thumb.jpg");
    }

    #[test]
    fn test_ten_entries_make_three_rows() {
        let grid = partition_grid(entries(10), 4).unwrap();
        assert_eq!(grid.row_sizes(), vec![4, 4, 2]);
        assert_eq!(grid.rows[2][1].name, "photo9");
    }

    #[test]
    fn test_exact_multiple_has_no_short_row() {
        let grid = partition_grid(entries(8), 4).unwrap();
        assert_eq!(grid.row_sizes(), vec![4, 4]);
    }

    #[test]
    fn test_empty_input_has_no_rows() {
        let grid = partition_grid(Vec::new(), 4).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.row_count(), 0);
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let err = partition_grid(entries(3), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
