//! Redis access for the aggregate `Stats` counters.
//!
//! The game server maintains a single JSON object under the `Stats` key.
//! This handle reads it; the write path exists for seeding test instances.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `Stats` | JSON | `{ "gamesCreated": n, "accountsCreated": n }` |

use fred::prelude::*;
use tweetrace_types::CacheStats;

use crate::error::StoreError;

/// Key holding the aggregate usage counters.
pub const STATS_KEY: &str = "Stats";

/// Connection parameters for the stats cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Hostname or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Password, if the instance requires `AUTH`.
    pub password: Option<String>,
    /// Logical database index selected after connecting.
    pub database: u8,
}

impl CacheConfig {
    /// Build the client configuration for a single, non-clustered server.
    fn to_client_config(&self) -> Config {
        Config {
            server: ServerConfig::new_centralized(self.host.as_str(), self.port),
            password: self.password.clone(),
            database: Some(self.database),
            ..Config::default()
        }
    }
}

/// Connection handle to the stats cache.
///
/// Wraps a [`fred::prelude::Client`] and exposes typed access to the
/// `Stats` key.
#[derive(Clone)]
pub struct StatsCache {
    client: Client,
}

impl StatsCache {
    /// Connect to the cache described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cache`] if the connection or `AUTH`/`SELECT` fails.
    pub async fn connect(config: &CacheConfig) -> Result<Self, StoreError> {
        let client = Builder::from_config(config.to_client_config()).build()?;
        client.init().await?;

        tracing::info!(
            host = config.host,
            port = config.port,
            database = config.database,
            "Connected to stats cache"
        );
        Ok(Self { client })
    }

    /// Read the aggregate counters at [`STATS_KEY`].
    ///
    /// A missing key or a JSON `null` yields zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedValue`] if the value is not a JSON
    /// object with numeric counters.
    /// Returns [`StoreError::Cache`] if the read fails.
    pub async fn get_stats(&self) -> Result<CacheStats, StoreError> {
        let value: Option<String> = self.client.get(STATS_KEY).await?;
        parse_stats(STATS_KEY, value.as_deref())
    }

    /// Overwrite the counters at [`STATS_KEY`].
    ///
    /// The game server owns this key; the snapshot job never writes it.
    /// This exists to seed test instances.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if serialization fails.
    /// Returns [`StoreError::Cache`] if the write fails.
    #[doc(hidden)]
    pub async fn set_stats(&self, stats: &CacheStats) -> Result<(), StoreError> {
        let json = serde_json::to_string(stats)?;
        let _: () = self
            .client
            .set(STATS_KEY, json.as_str(), None, None, false)
            .await?;
        Ok(())
    }

    /// Delete the [`STATS_KEY`] entry. Used to reset test instances.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cache`] if the delete fails.
    #[doc(hidden)]
    pub async fn delete_stats(&self) -> Result<(), StoreError> {
        let _: u32 = self.client.del(STATS_KEY).await?;
        Ok(())
    }

    /// Close the connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cache`] if `QUIT` fails.
    pub async fn quit(&self) -> Result<(), StoreError> {
        self.client.quit().await?;
        Ok(())
    }
}

/// Decode the raw value stored at `key`.
fn parse_stats(key: &str, raw: Option<&str>) -> Result<CacheStats, StoreError> {
    let Some(raw) = raw else {
        tracing::warn!(key = key, "stats key not set, using zero counters");
        return Ok(CacheStats::default());
    };

    let parsed: Option<CacheStats> =
        serde_json::from_str(raw).map_err(|source| StoreError::MalformedValue {
            key: key.to_owned(),
            source,
        })?;

    Ok(parsed.unwrap_or_else(|| {
        tracing::warn!(key = key, "stats value is null, using zero counters");
        CacheStats::default()
    }))
}
