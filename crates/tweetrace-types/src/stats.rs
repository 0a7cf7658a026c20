//! Aggregate usage counters and their dated history.
//!
//! The game server keeps a running `Stats` object in the cache. The
//! snapshotter copies it once per run into `stats.json`:
//!
//! ```json
//! { "stats": [ { "date": "2026-10-19", "gamesCreated": 5, "accountsCreated": 0 } ] }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Counters stored under the `Stats` cache key.
///
/// Both fields are optional in the stored object and default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Total games created on the server.
    #[serde(default)]
    pub games_created: u64,
    /// Total player accounts created on the server.
    #[serde(default)]
    pub accounts_created: u64,
}

/// One dated record of the aggregate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Calendar date of the run (serialized as `YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Games created as of `date`.
    pub games_created: u64,
    /// Accounts created as of `date`.
    pub accounts_created: u64,
}

impl StatsSnapshot {
    /// Build a snapshot of `stats` taken on `date`.
    pub const fn new(date: NaiveDate, stats: CacheStats) -> Self {
        Self {
            date,
            games_created: stats.games_created,
            accounts_created: stats.accounts_created,
        }
    }
}

/// The full history document persisted in `stats.json`.
///
/// Entries are only ever appended. Recorded entries stay raw JSON, so
/// fields this crate does not know about (inside an entry or at the top
/// level) survive a rewrite unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Entries in the order they were recorded.
    pub stats: Vec<serde_json::Value>,
    /// Any other top-level keys present in the file.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StatsHistory {
    /// Append a snapshot to the end of the history.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be converted to JSON.
    pub fn append(&mut self, snapshot: StatsSnapshot) -> Result<(), serde_json::Error> {
        self.stats.push(serde_json::to_value(snapshot)?);
        Ok(())
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Whether no snapshot has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
