//! Shared record types for the tweetrace batch jobs.
//!
//! These are the shapes written to and read from the JSON files that the
//! game server consumes, plus the counters read from the stats cache.
//!
//! # Modules
//!
//! - [`stats`] -- Cache counters, dated snapshots, and the history document
//! - [`account`] -- Author metadata resolved from the social API
//! - [`post`] -- Curated posts and the popularity metric used to rank them

pub mod account;
pub mod post;
pub mod stats;

// Re-export all public types at crate root for convenience.
pub use account::Account;
pub use post::{CuratedPost, Popularity, PopularityMetric};
pub use stats::{CacheStats, StatsHistory, StatsSnapshot};
