//! Configuration for the stats snapshotter.
//!
//! All configuration comes from environment variables, optionally seeded
//! from a `.env` file in the working directory.

use std::path::PathBuf;

use tweetrace_store::CacheConfig;

use crate::error::SnapshotError;

/// Complete snapshotter configuration.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Where to find the stats cache.
    pub cache: CacheConfig,
    /// Path of the history file to append to.
    pub stats_file: PathBuf,
}

impl SnapshotConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `REDIS_ADDR` -- cache hostname
    ///
    /// Optional variables:
    /// - `REDIS_PORT` -- cache port (default 6379)
    /// - `REDIS_PASS` -- cache password (default none)
    /// - `REDIS_DB` -- logical database index (default 0)
    /// - `STATS_FILE` -- history file path (default `stats.json`)
    pub fn from_env() -> Result<Self, SnapshotError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SnapshotError> {
        let host = lookup("REDIS_ADDR")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SnapshotError::Config("missing required env var REDIS_ADDR".to_owned()))?;

        let port: u16 = lookup("REDIS_PORT")
            .unwrap_or_else(|| "6379".to_owned())
            .parse()
            .map_err(|e| SnapshotError::Config(format!("invalid REDIS_PORT: {e}")))?;

        let database: u8 = lookup("REDIS_DB")
            .unwrap_or_else(|| "0".to_owned())
            .parse()
            .map_err(|e| SnapshotError::Config(format!("invalid REDIS_DB: {e}")))?;

        let password = lookup("REDIS_PASS").filter(|v| !v.is_empty());

        let stats_file =
            PathBuf::from(lookup("STATS_FILE").unwrap_or_else(|| "stats.json".to_owned()));

        Ok(Self {
            cache: CacheConfig {
                host,
                port,
                password,
                database,
            },
            stats_file,
        })
    }
}
