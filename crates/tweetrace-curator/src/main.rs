//! Content curator entry point.
//!
//! Walks a fixed list of accounts on the social API, keeps each account's
//! most popular clean, self-contained posts, and writes two files for the
//! game server: the author list (`users.json`) and the curated posts
//! (`tweets.json`).
//!
//! # Architecture
//!
//! ```text
//! accounts --> TwitterClient --> normalize --> ContentFilter --> rank/top N --> JSON files
//! ```
//!
//! A failure for one account is logged and the run moves on to the next.
//! Configuration and output failures end the run with a non-zero status.

mod config;
mod curate;
mod error;
mod filter;
mod profanity;
mod twitter;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{ApiCredentials, CuratorConfig};
use crate::curate::{Pipeline, curate};
use crate::profanity::WordListCheck;
use crate::twitter::TwitterClient;

/// Application entry point.
///
/// Initializes logging, loads configuration, processes every configured
/// account, then overwrites both output files.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, or an output
/// file cannot be written.
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

    info!("tweetrace-curator starting");

    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded .env");
    }

    let config = CuratorConfig::load()?;
    let credentials = ApiCredentials::from_env()?;
    info!(
        preset = ?config.preset,
        accounts = config.accounts.len(),
        metric = ?config.ranking.metric,
        top_n = config.ranking.top_n,
        min_length = config.filter.min_length,
        excluded = ?config.filter.excluded_substrings,
        pacing = ?config.pacing.policy,
        wait_on_rate_limit = config.fetch.wait_on_rate_limit,
        "configuration loaded"
    );

    let profanity = WordListCheck::with_extra_words(&config.profanity.extra_words);
    info!(words = profanity.len(), "profanity word list loaded");

    let client = TwitterClient::new(&config.fetch, &credentials);
    let pipeline = Pipeline::from_config(&config, Box::new(profanity));

    let run = curate(&client, &config.accounts, &pipeline).await;
    run.write(&config.output)?;

    info!(
        authors = run.authors.len(),
        posts = run.posts.len(),
        skipped = ?run.skipped,
        "tweetrace-curator finished"
    );
    Ok(())
}
