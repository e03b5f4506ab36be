//! Error taxonomy for the synchronization pipelines.
//!
//! Whether an error is fatal depends on where it happens: a transport or
//! content failure on a primary source aborts the run, the same failure on an
//! auxiliary source only degrades the result. The variants themselves carry
//! no policy.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection error, timeout, non-success status, or retries exhausted.
    #[error("transport failure for {url}: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// A response arrived but could not be decoded as the expected format.
    #[error("content failure for {url}: {message}")]
    Content { url: String, message: String },

    /// Structurally invalid input such as an insecure URL or a bad locale code.
    #[error("validation failure: {0}")]
    Validation(String),

    /// A file could not be read or written, or a directory could not be created.
    #[error("persistence failure for {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline stage an error belongs to, used in fatal diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Parse,
    Validate,
    Storage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Parse => "parse",
            Stage::Validate => "validate",
            Stage::Storage => "storage",
        };
        f.write_str(name)
    }
}

impl SyncError {
    pub fn transport(url: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        SyncError::Transport {
            url: url.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn content(url: &str, message: impl Into<String>) -> Self {
        SyncError::Content {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Persistence {
            path: path.into(),
            source,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            SyncError::Transport { .. } => Stage::Fetch,
            SyncError::Content { .. } => Stage::Parse,
            SyncError::Validation(_) => Stage::Validate,
            SyncError::Persistence { .. } => Stage::Storage,
        }
    }

    /// HTTP status for transport failures that got as far as a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
