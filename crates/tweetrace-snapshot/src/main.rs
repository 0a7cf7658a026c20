//! Stats snapshotter entry point.
//!
//! Reads the game server's aggregate counters from the `Stats` cache key
//! and appends a dated record to the `stats.json` history file. Run once
//! per day from a scheduler.
//!
//! # Sequence
//!
//! 1. Load `.env`, then initialize structured logging (tracing)
//! 2. Read configuration from the environment
//! 3. Connect to the stats cache
//! 4. Read `Stats`, append `{ date, gamesCreated, accountsCreated }`

mod config;
mod error;
mod snapshot;

use tracing::info;
use tracing_subscriber::EnvFilter;
use tweetrace_store::{HistoryFile, StatsCache};

use crate::config::SnapshotConfig;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the cache, or the history file fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env first so RUST_LOG from it reaches the filter
    let dotenv_path = dotenvy::dotenv().ok();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("tweetrace-snapshot starting");

    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded .env");
    }

    let config = SnapshotConfig::from_env()?;
    info!(
        host = config.cache.host,
        port = config.cache.port,
        database = config.cache.database,
        stats_file = %config.stats_file.display(),
        "configuration loaded"
    );

    let today = chrono::Local::now().date_naive();
    let cache = StatsCache::connect(&config.cache).await?;
    let history = HistoryFile::new(&config.stats_file);

    let snapshot = snapshot::run(&cache, &history, today).await?;
    cache.quit().await?;

    info!(
        date = %snapshot.date,
        games_created = snapshot.games_created,
        accounts_created = snapshot.accounts_created,
        "tweetrace-snapshot finished"
    );
    Ok(())
}
