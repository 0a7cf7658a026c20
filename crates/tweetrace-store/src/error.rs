//! Error types for the storage layer.
//!
//! All errors are propagated via [`StoreError`] which wraps the underlying
//! [`fred`], [`std::io`] and [`serde_json`] errors with the key or path
//! that was being accessed.

use std::path::PathBuf;

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A Redis operation failed.
    #[error("Redis error: {0}")]
    Cache(#[from] fred::error::Error),

    /// The value stored at a cache key is not valid JSON for its type.
    #[error("malformed value at cache key {key}: {source}")]
    MalformedValue {
        /// The key that was read.
        key: String,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The history file exists but is not a `{ "stats": [...] }` document.
    #[error("malformed history file {}: {source}", path.display())]
    MalformedHistory {
        /// The history file.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// A serialization error while producing output.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
