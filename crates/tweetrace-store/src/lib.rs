//! Storage layer for the tweetrace batch jobs.
//!
//! The stats cache is the game server's Redis instance; this crate only
//! ever reads the single `Stats` key from it. Everything else lives in
//! plain JSON files next to the server:
//!
//! ```text
//! Redis "Stats" --> StatsCache --> HistoryFile   (stats.json, append)
//! social API ----> curator ----> write_json     (users.json, tweets.json, overwrite)
//! ```
//!
//! # Modules
//!
//! - [`cache`] -- Redis connection and the `Stats` key
//! - [`history`] -- Read-modify-append-write of `stats.json`
//! - [`output`] -- Whole-file JSON writers for curator output
//! - [`error`] -- Shared error types

pub mod cache;
pub mod error;
pub mod history;
pub mod output;

// Re-export primary types for convenience.
pub use cache::{CacheConfig, STATS_KEY, StatsCache};
pub use error::StoreError;
pub use history::HistoryFile;
pub use output::write_json;
