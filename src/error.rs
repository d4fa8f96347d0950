//! Error taxonomy for key generation and properties updates.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeygenError {
    #[error("entropy source unavailable: {0}")]
    EntropySourceUnavailable(String),

    #[error("invalid key length {0}: must be at least 1")]
    InvalidLength(usize),

    #[error("cannot read {}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}", .path.display())]
    FileUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot lock {}", .path.display())]
    LockUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl KeygenError {
    /// Whether the on-disk properties file may have been modified when this error occurred.
    pub fn may_have_touched_file(&self) -> bool {
        matches!(self, KeygenError::FileUnwritable { .. })
    }
}

pub type Result<T> = std::result::Result<T, KeygenError>;
