use regex::RegexBuilder;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::data::{partition_grid, CatalogEntry, Grid, SearchResults};
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::naming::validate_filename;

/// The Catalog turns the flat source directory into listings.
///
/// It holds no state besides its configuration: every call re-reads the
/// directory, so uploads and deletions show up immediately. It never looks
/// at the derived directories.
#[derive(Debug, Clone)]
pub struct Catalog {
    source_dir: PathBuf,
    extensions: Vec<String>,
    grid_width: usize,
}

impl Catalog {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            extensions: config.extensions.clone(),
            grid_width: config.grid_width,
        }
    }

    /// Get the path to the source directory
    pub fn source_dir(&self) -> &PathBuf {
        &self.source_dir
    }

    /// All source filenames, extension included.
    ///
    /// Order is whatever the directory listing yields; it is deliberately not
    /// sorted so pagination stays stable against the platform's order.
    /// Subdirectories are skipped. An empty directory is `Ok(vec![])`, an
    /// unreadable one is an error.
    ///
    /// A single bad entry never hides the rest of the gallery: dangling
    /// symlinks, unreadable entries and names that are not valid UTF-8 are
    /// logged and left out. Symlinks to regular files are listed.
    pub fn filenames(&self) -> Result<Vec<String>> {
        let mut filenames = Vec::new();

        for entry in WalkDir::new(&self.source_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                    return Err(GalleryError::Io {
                        path: self.source_dir.clone(),
                        source,
                    });
                }
                Err(err) => {
                    warn!(error = %err, "skipping unreadable source entry");
                    continue;
                }
            };

            let is_file = if entry.path_is_symlink() {
                // metadata() follows the link; a dangling one fails here
                entry.path().is_file()
            } else {
                entry.file_type().is_file()
            };
            if !is_file {
                if entry.path_is_symlink() && !entry.path().exists() {
                    warn!(path = %entry.path().display(), "skipping dangling symlink");
                }
                continue;
            }

            match entry.file_name().to_str() {
                Some(name) => filenames.push(name.to_string()),
                None => {
                    warn!(path = %entry.path().display(), "skipping source with a non UTF-8 name");
                }
            }
        }

        debug!(dir = %self.source_dir.display(), count = filenames.len(), "listed source images");
        Ok(filenames)
    }

    /// Every source image as a catalog entry, in listing order
    pub fn list_all(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .filenames()?
            .iter()
            .map(|name| CatalogEntry::from_filename(name))
            .collect())
    }

    /// One page of entries. `page_number` is 1-based; a page past the end
    /// is empty rather than an error.
    pub fn paginate(&self, page_number: usize, page_size: usize) -> Result<Vec<CatalogEntry>> {
        if page_size == 0 {
            return Err(GalleryError::InvalidArgument(
                "page size must be positive".into(),
            ));
        }
        if page_number == 0 {
            return Err(GalleryError::InvalidArgument(
                "page numbers start at 1".into(),
            ));
        }

        let filenames = self.filenames()?;

        let start = (page_number - 1).saturating_mul(page_size);
        if start >= filenames.len() {
            return Ok(Vec::new());
        }
        let end = page_number.saturating_mul(page_size).min(filenames.len());

        Ok(filenames[start..end]
            .iter()
            .map(|name| CatalogEntry::from_filename(name))
            .collect())
    }

    /// Case-insensitive search over display names.
    ///
    /// `query` is a regular expression, not a literal: "^IMG_\d+" works, and
    /// so does anything else the `regex` syntax accepts. Callers passing
    /// untrusted input should escape it with `regex::escape` if they want
    /// plain substring matching. A malformed pattern is an error.
    pub fn search(&self, query: &str) -> Result<SearchResults> {
        let pattern = RegexBuilder::new(query).case_insensitive(true).build()?;

        let entries: Vec<CatalogEntry> = self
            .list_all()?
            .into_iter()
            .filter(|entry| pattern.is_match(&entry.name))
            .collect();

        debug!(query, matches = entries.len(), "searched catalog");

        Ok(SearchResults {
            count: entries.len(),
            entries,
            query: query.to_string(),
        })
    }

    /// The full catalog laid out in rows of the configured grid width
    pub fn grid(&self) -> Result<Grid> {
        partition_grid(self.list_all()?, self.grid_width)
    }

    /// Find the source filename behind a display name by trying each
    /// accepted extension in order ("Jellyfish" -> "Jellyfish.jpg").
    pub fn resolve(&self, name: &str) -> Result<String> {
        validate_filename(name)?;

        self.extensions
            .iter()
            .map(|ext| format!("{}{}", name, ext))
            .find(|filename| self.source_dir.join(filename).is_file())
            .ok_or_else(|| GalleryError::NotFound(self.source_dir.join(name)))
    }
}
