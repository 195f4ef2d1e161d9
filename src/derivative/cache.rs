use std::fmt::Debug;
use std::path::Path;

/// Answers "has this derivative already been computed?"
///
/// The only evidence kept today is the file itself. Anything that can answer
/// this question (a metadata table, a content hash index) can stand in without
/// touching the generator.
pub trait DerivativeCache: Debug + Send + Sync {
    fn derivative_exists(&self, path: &Path) -> bool;
}

/// Treats a derivative as cached when a file exists at its path
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCache;

impl DerivativeCache for FsCache {
    fn derivative_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
