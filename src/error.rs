//! Error types shared by the derivative generator and the catalog indexer.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, GalleryError>;

#[derive(thiserror::Error, Debug)]
pub enum GalleryError {
    #[error("source image not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("resize task failed to complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("invalid gallery configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Coarse classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Decode,
    Io,
    InvalidArgument,
}

impl GalleryError {
    /// Encoding and task failures count as i/o failures; a bad config file
    /// or pattern counts as an invalid argument.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Encode { .. } | Self::Io { .. } | Self::Task(_) => ErrorKind::Io,
            Self::InvalidArgument(_) | Self::InvalidPattern(_) | Self::Config(_) => {
                ErrorKind::InvalidArgument
            }
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// `image` reports file-level problems as `IoError`; keep those apart from
    /// real decode failures.
    pub(crate) fn decode(path: impl AsRef<Path>, source: image::ImageError) -> Self {
        match source {
            image::ImageError::IoError(err) => Self::io(path, err),
            source => Self::Decode {
                path: path.as_ref().to_path_buf(),
                source,
            },
        }
    }

    pub(crate) fn encode(path: impl AsRef<Path>, source: image::ImageError) -> Self {
        match source {
            image::ImageError::IoError(err) => Self::Io {
                path: path.as_ref().to_path_buf(),
                source: err,
            },
            source => Self::Encode {
                path: path.as_ref().to_path_buf(),
                source,
            },
        }
    }
}
