//! Error types for the content curator.
//!
//! Configuration and output errors end the run. API errors are caught per
//! account by the curation loop, logged, and the account is skipped.

/// Errors that can occur during a curation run.
#[derive(Debug, thiserror::Error)]
pub enum CuratorError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to read the configuration file.
    #[error("failed to read config file: {source}")]
    ConfigIo {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the configuration YAML.
    #[error("failed to parse config YAML: {source}")]
    ConfigYaml {
        /// The underlying YAML error.
        #[from]
        source: serde_yml::Error,
    },

    /// The HTTP request to the social API could not be completed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The social API answered with an error or an unusable payload.
    #[error("API error: {0}")]
    Api(String),

    /// The social API rate limit was hit and waiting is disabled.
    #[error("rate limited, window resets in {reset_in_secs}s")]
    RateLimited {
        /// Seconds until the rate-limit window resets.
        reset_in_secs: u64,
    },

    /// Writing an output file failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: tweetrace_store::StoreError,
    },
}
