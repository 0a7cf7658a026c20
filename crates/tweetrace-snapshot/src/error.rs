//! Error types for the stats snapshotter.

/// Errors that end a snapshot run.
///
/// None of these are recovered from: the process exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Reading the cache or updating the history file failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: tweetrace_store::StoreError,
    },
}
