//! Configuration loading and typed config structures for the curator.
//!
//! The run is described by `curator-config.yaml`. A `preset` key picks one
//! of the two built-in policies and every other key overrides it:
//!
//! ```yaml
//! preset: likes
//! accounts: [NASA, nytimes]
//! filter:
//!   min_length: 140
//! ```
//!
//! The API bearer credential is never read from the file; it comes from
//! the `BEARER_TOKEN` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_yml::Value;
use tweetrace_types::PopularityMetric;

use crate::error::CuratorError;

/// Built-in policy bundles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Rank by reposts, exclude `@`, `http` and `#`, fixed pause between accounts.
    #[default]
    Retweets,
    /// Rank by likes, exclude `@` and `http`, no pause between accounts.
    Likes,
}

/// Complete curator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratorConfig {
    /// Preset the remaining values started from.
    pub preset: Preset,
    /// Handles to process, in order.
    pub accounts: Vec<String>,
    /// Content filter thresholds.
    pub filter: FilterConfig,
    /// Ranking policy.
    pub ranking: RankingConfig,
    /// Social API access.
    pub fetch: FetchConfig,
    /// Pacing between accounts.
    pub pacing: PacingConfig,
    /// Output file locations.
    pub output: OutputConfig,
    /// Profanity word list extensions.
    #[serde(default)]
    pub profanity: ProfanityConfig,
}

/// Thresholds applied to normalized post text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Posts shorter than this many characters are rejected.
    pub min_length: usize,
    /// Posts containing any of these substrings are rejected.
    pub excluded_substrings: Vec<String>,
}

/// How surviving posts are ordered and cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Engagement count to rank by.
    pub metric: PopularityMetric,
    /// Posts kept per account.
    pub top_n: usize,
}

/// Social API endpoint and page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// API base URL without trailing slash (e.g. `https://api.twitter.com/2`).
    pub api_base_url: String,
    /// Posts requested per account (the API accepts 5 to 100).
    pub max_results: u32,
    /// Sleep through HTTP 429 until the window resets, then reissue.
    /// When off, a 429 fails the current account.
    #[serde(default = "default_wait_on_rate_limit")]
    pub wait_on_rate_limit: bool,
}

const fn default_wait_on_rate_limit() -> bool {
    true
}

/// How the run spaces out API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PausePolicy {
    /// Sleep `pause_ms` after each account whose profile resolved.
    Fixed,
    /// No sleep between accounts; pacing is left to the API's rate-limit
    /// responses (see [`FetchConfig::wait_on_rate_limit`]).
    ClientManaged,
}

/// Pacing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause policy.
    pub policy: PausePolicy,
    /// Pause length for [`PausePolicy::Fixed`].
    #[serde(default)]
    pub pause_ms: u64,
}

impl PacingConfig {
    /// Pause to take between two accounts, if any.
    pub const fn pause(&self) -> Option<Duration> {
        match self.policy {
            PausePolicy::Fixed if self.pause_ms > 0 => Some(Duration::from_millis(self.pause_ms)),
            PausePolicy::Fixed | PausePolicy::ClientManaged => None,
        }
    }
}

/// Where the run writes its results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Author list (`users.json`).
    pub users_path: PathBuf,
    /// Curated post list (`tweets.json`).
    pub tweets_path: PathBuf,
}

/// Additions to the built-in profanity word list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfanityConfig {
    /// Extra words treated as profane (case-insensitive).
    #[serde(default)]
    pub extra_words: Vec<String>,
}

/// Credentials for the social API.
#[derive(Clone)]
pub struct ApiCredentials {
    /// OAuth 2.0 app-only bearer token.
    pub bearer_token: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

impl ApiCredentials {
    /// Read `BEARER_TOKEN` from the environment.
    pub fn from_env() -> Result<Self, CuratorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CuratorError> {
        lookup("BEARER_TOKEN")
            .filter(|v| !v.is_empty())
            .map(|bearer_token| Self { bearer_token })
            .ok_or_else(|| CuratorError::Config("missing required env var BEARER_TOKEN".to_owned()))
    }
}

impl CuratorConfig {
    /// The starting values for `preset`.
    pub fn preset(preset: Preset) -> Self {
        let (excluded, metric, pacing): (&[&str], _, _) = match preset {
            Preset::Retweets => (
                &["@", "http", "#"][..],
                PopularityMetric::Retweets,
                PacingConfig {
                    policy: PausePolicy::Fixed,
                    pause_ms: 1000,
                },
            ),
            Preset::Likes => (
                &["@", "http"][..],
                PopularityMetric::Likes,
                PacingConfig {
                    policy: PausePolicy::ClientManaged,
                    pause_ms: 0,
                },
            ),
        };

        Self {
            preset,
            accounts: Vec::new(),
            filter: FilterConfig {
                min_length: 120,
                excluded_substrings: excluded.iter().map(|s| (*s).to_owned()).collect(),
            },
            ranking: RankingConfig { metric, top_n: 5 },
            fetch: FetchConfig {
                api_base_url: "https://api.twitter.com/2".to_owned(),
                max_results: 100,
                wait_on_rate_limit: true,
            },
            pacing,
            output: OutputConfig {
                users_path: PathBuf::from("../server/users.json"),
                tweets_path: PathBuf::from("../server/tweets.json"),
            },
            profanity: ProfanityConfig::default(),
        }
    }

    /// Load configuration the way the binary does.
    ///
    /// Reads the file named by `CURATOR_CONFIG` (default
    /// `curator-config.yaml`). A missing file means the default preset with
    /// no accounts, which fails validation. `TWITTER_API_URL` overrides
    /// `fetch.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError`] if the file cannot be read or parsed, or the
    /// result is invalid.
    pub fn load() -> Result<Self, CuratorError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CuratorError> {
        let path = PathBuf::from(
            lookup("CURATOR_CONFIG").unwrap_or_else(|| "curator-config.yaml".to_owned()),
        );

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            Self::preset(Preset::default())
        };

        if let Some(url) = lookup("TWITTER_API_URL").filter(|v| !v.is_empty()) {
            config.fetch.api_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::ConfigIo`] if the file cannot be read, or
    /// [`CuratorError::ConfigYaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, CuratorError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, layering it over its preset.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::ConfigYaml`] if the string is not valid YAML
    /// or a value has the wrong type.
    pub fn parse(yaml: &str) -> Result<Self, CuratorError> {
        let overrides: Value = if yaml.trim().is_empty() {
            Value::Null
        } else {
            serde_yml::from_str(yaml)?
        };

        let preset: Preset = match overrides.get("preset") {
            Some(value) => serde_yml::from_value(value.clone())?,
            None => Preset::default(),
        };

        let mut merged = serde_yml::to_value(Self::preset(preset))?;
        merge(&mut merged, overrides);
        Ok(serde_yml::from_value(merged)?)
    }

    /// Reject configurations that cannot produce a meaningful run.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), CuratorError> {
        if self.accounts.is_empty() {
            return Err(CuratorError::Config("no accounts configured".to_owned()));
        }
        if let Some(blank) = self.accounts.iter().position(|a| a.trim().is_empty()) {
            return Err(CuratorError::Config(format!("accounts[{blank}] is empty")));
        }
        if !(5..=100).contains(&self.fetch.max_results) {
            return Err(CuratorError::Config(format!(
                "fetch.max_results must be between 5 and 100, got {}",
                self.fetch.max_results
            )));
        }
        if self.ranking.top_n == 0 {
            return Err(CuratorError::Config("ranking.top_n must be at least 1".to_owned()));
        }
        if self.filter.excluded_substrings.iter().any(String::is_empty) {
            return Err(CuratorError::Config(
                "filter.excluded_substrings must not contain an empty string".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`. Null overlay values keep the base.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_file_is_the_retweets_preset() {
        let config = CuratorConfig::parse("").unwrap();
        assert_eq!(config, CuratorConfig::preset(Preset::Retweets));
        assert_eq!(config.filter.excluded_substrings, vec!["@", "http", "#"]);
        assert_eq!(config.filter.min_length, 120);
        assert_eq!(config.ranking.top_n, 5);
        assert_eq!(config.pacing.pause(), Some(Duration::from_secs(1)));
        assert!(config.fetch.wait_on_rate_limit);
    }

    #[test]
    fn both_presets_wait_out_rate_limits() {
        let retweets = CuratorConfig::parse("accounts: [NASA]\n").unwrap();
        assert_eq!(retweets.pacing.policy, PausePolicy::Fixed);
        assert!(retweets.fetch.wait_on_rate_limit);

        let likes = CuratorConfig::parse("preset: likes\naccounts: [NASA]\n").unwrap();
        assert_eq!(likes.pacing.policy, PausePolicy::ClientManaged);
        assert!(likes.fetch.wait_on_rate_limit);

        // A fetch section that omits the flag still waits.
        let partial = CuratorConfig::parse("fetch:\n  max_results: 50\n").unwrap();
        assert!(partial.fetch.wait_on_rate_limit);

        let off = CuratorConfig::parse("fetch:\n  wait_on_rate_limit: false\n").unwrap();
        assert!(!off.fetch.wait_on_rate_limit);
        assert_eq!(off.pacing.pause(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn likes_preset_switches_every_variant_option() {
        let config = CuratorConfig::parse("preset: likes\naccounts: [NASA]\n").unwrap();
        assert_eq!(config.preset, Preset::Likes);
        assert_eq!(config.filter.excluded_substrings, vec!["@", "http"]);
        assert_eq!(config.ranking.metric, PopularityMetric::Likes);
        assert_eq!(config.pacing.pause(), None);
        assert!(config.fetch.wait_on_rate_limit);
        assert_eq!(config.accounts, vec!["NASA"]);
    }

    #[test]
    fn explicit_keys_override_the_preset() {
        let yaml = r"
preset: likes
accounts:
  - NASA
  - nytimes
filter:
  min_length: 140
ranking:
  top_n: 3
output:
  tweets_path: out/tweets.json
";
        let config = CuratorConfig::parse(yaml).unwrap();
        assert_eq!(config.filter.min_length, 140);
        assert_eq!(config.filter.excluded_substrings, vec!["@", "http"]);
        assert_eq!(config.ranking.top_n, 3);
        assert_eq!(config.ranking.metric, PopularityMetric::Likes);
        assert_eq!(config.output.tweets_path, PathBuf::from("out/tweets.json"));
        assert_eq!(
            config.output.users_path,
            PathBuf::from("../server/users.json")
        );
        config.validate().unwrap();
    }

    #[test]
    fn fixed_pause_of_zero_means_no_pause() {
        let config =
            CuratorConfig::parse("pacing:\n  policy: fixed\n  pause_ms: 0\n").unwrap();
        assert_eq!(config.pacing.pause(), None);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(CuratorConfig::parse("preset: hashtags").is_err());
    }

    #[test]
    fn wrongly_typed_value_is_rejected() {
        assert!(CuratorConfig::parse("filter:\n  min_length: long\n").is_err());
    }

    #[test]
    fn validation_catches_unusable_values() {
        let mut config = CuratorConfig::preset(Preset::Retweets);
        assert!(config.validate().is_err(), "no accounts");

        config.accounts = vec!["NASA".to_owned()];
        config.validate().unwrap();

        config.fetch.max_results = 500;
        assert!(config.validate().is_err());
        config.fetch.max_results = 100;

        config.ranking.top_n = 0;
        assert!(config.validate().is_err());
        config.ranking.top_n = 5;

        config.filter.excluded_substrings.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file_and_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curator.yaml");
        std::fs::write(&path, "accounts: [NASA]\n").unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let config = CuratorConfig::load_with(|name| match name {
            "CURATOR_CONFIG" => Some(path_str.clone()),
            "TWITTER_API_URL" => Some("http://localhost:9000/2".to_owned()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.accounts, vec!["NASA"]);
        assert_eq!(config.fetch.api_base_url, "http://localhost:9000/2");
    }

    #[test]
    fn load_without_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml").to_string_lossy().into_owned();
        let result = CuratorConfig::load_with(|name| {
            (name == "CURATOR_CONFIG").then(|| missing.clone())
        });
        assert!(matches!(result, Err(CuratorError::Config(_))));
    }

    #[test]
    fn bearer_token_is_required_and_redacted() {
        assert!(ApiCredentials::from_lookup(|_| None).is_err());
        assert!(ApiCredentials::from_lookup(|_| Some(String::new())).is_err());

        let creds = ApiCredentials::from_lookup(|_| Some("abc123".to_owned())).unwrap();
        assert_eq!(creds.bearer_token, "abc123");
        assert!(!format!("{creds:?}").contains("abc123"));
    }
}
