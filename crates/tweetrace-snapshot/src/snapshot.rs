//! One snapshot run: read the counters, append a dated record.

use chrono::NaiveDate;
use tracing::info;
use tweetrace_store::{HistoryFile, StatsCache};
use tweetrace_types::{CacheStats, StatsSnapshot};

use crate::error::SnapshotError;

/// Read the current counters from `cache` and append them to `history`.
///
/// # Errors
///
/// Returns [`SnapshotError::Store`] if the cache read fails, the cached
/// value is malformed, or the history file is missing or malformed.
pub async fn run(
    cache: &StatsCache,
    history: &HistoryFile,
    today: NaiveDate,
) -> Result<StatsSnapshot, SnapshotError> {
    let stats = cache.get_stats().await?;
    info!(
        games_created = stats.games_created,
        accounts_created = stats.accounts_created,
        "stats read from cache"
    );
    record(history, stats, today)
}

/// Append a snapshot of `stats` dated `today` to `history`.
///
/// # Errors
///
/// Returns [`SnapshotError::Store`] if the history file is missing or
/// malformed, or cannot be rewritten.
pub fn record(
    history: &HistoryFile,
    stats: CacheStats,
    today: NaiveDate,
) -> Result<StatsSnapshot, SnapshotError> {
    let snapshot = StatsSnapshot::new(today, stats);
    let written = history.append(snapshot)?;
    info!(
        path = %history.path().display(),
        date = %snapshot.date,
        entries = written.len(),
        "snapshot appended"
    );
    Ok(snapshot)
}
