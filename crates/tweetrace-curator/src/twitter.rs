//! Social API client (Twitter API v2).
//!
//! Two endpoints are used, both with app-only bearer authentication:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | profile lookup | `GET {base}/users/by/username/{handle}` |
//! | recent posts | `GET {base}/users/{id}/tweets?max_results=N&tweet.fields=public_metrics&exclude=replies,retweets` |
//!
//! When `fetch.wait_on_rate_limit` is set, an HTTP 429 makes the client
//! sleep until the window named by `x-rate-limit-reset` has passed and then
//! reissue the same request. Nothing else is retried.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use tweetrace_types::Account;

use crate::config::{ApiCredentials, FetchConfig};
use crate::curate::{FetchedPost, PostSource};
use crate::error::CuratorError;

/// Wait used when a 429 carries no usable reset header.
const FALLBACK_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// HTTP client for the social API.
pub struct TwitterClient {
    client: reqwest::Client,
    api_base_url: String,
    bearer_token: String,
    max_results: u32,
    wait_on_rate_limit: bool,
}

impl TwitterClient {
    /// Create a client for the endpoint in `fetch`.
    pub fn new(fetch: &FetchConfig, credentials: &ApiCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: fetch.api_base_url.trim_end_matches('/').to_owned(),
            bearer_token: credentials.bearer_token.clone(),
            max_results: fetch.max_results,
            wait_on_rate_limit: fetch.wait_on_rate_limit,
        }
    }

    /// Resolve a handle to its profile.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::Api`] if the handle does not resolve, and
    /// [`CuratorError::Http`] or [`CuratorError::RateLimited`] for transport
    /// problems.
    pub async fn get_user(&self, handle: &str) -> Result<Account, CuratorError> {
        let url = format!("{}/users/by/username/{handle}", self.api_base_url);
        let response: UserResponse = self.get_json(&url, &[]).await?;
        account_from_response(handle, response)
    }

    /// Fetch recent original posts (no replies, no reposts) for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::Api`] if the API reports an error instead of
    /// posts, and [`CuratorError::Http`] or [`CuratorError::RateLimited`]
    /// for transport problems.
    pub async fn get_users_tweets(&self, user_id: u64) -> Result<Vec<FetchedPost>, CuratorError> {
        let url = format!("{}/users/{user_id}/tweets", self.api_base_url);
        let query = [
            ("max_results", self.max_results.to_string()),
            ("tweet.fields", "public_metrics".to_owned()),
            ("exclude", "replies,retweets".to_owned()),
        ];
        let response: TimelineResponse = self.get_json(&url, &query).await?;
        posts_from_response(response)
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CuratorError> {
        loop {
            debug!(url = url, "social API request");
            let response = self
                .client
                .get(url)
                .bearer_auth(&self.bearer_token)
                .query(query)
                .send()
                .await
                .map_err(|e| CuratorError::Http(format!("request to {url} failed: {e}")))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let now = chrono::Utc::now().timestamp();
                let wait = rate_limit_wait(response.headers(), now);
                if !self.wait_on_rate_limit {
                    return Err(CuratorError::RateLimited {
                        reset_in_secs: wait.as_secs(),
                    });
                }
                warn!(
                    url = url,
                    wait_secs = wait.as_secs(),
                    "rate limit reached, sleeping until window resets"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unable to read error body".to_owned());
                return Err(CuratorError::Api(format!("{url} returned {status}: {error_body}")));
            }

            return response
                .json()
                .await
                .map_err(|e| CuratorError::Api(format!("{url} response parse failed: {e}")));
        }
    }
}

impl PostSource for TwitterClient {
    async fn lookup_account(&self, handle: &str) -> Result<Account, CuratorError> {
        self.get_user(handle).await
    }

    async fn recent_posts(&self, account: &Account) -> Result<Vec<FetchedPost>, CuratorError> {
        self.get_users_tweets(account.user_id).await
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of a profile lookup.
#[derive(Debug, Deserialize)]
struct UserResponse {
    data: Option<UserData>,
    #[serde(default)]
    errors: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    name: String,
    username: String,
}

/// Body of a timeline listing.
#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    data: Vec<TweetData>,
    #[serde(default)]
    errors: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    text: String,
    #[serde(default)]
    public_metrics: PublicMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    like_count: u64,
}

/// One entry of the API's `errors` array.
#[derive(Debug, Deserialize)]
struct ApiProblem {
    title: Option<String>,
    detail: Option<String>,
}

impl ApiProblem {
    fn describe(problems: &[Self]) -> String {
        let parts: Vec<&str> = problems
            .iter()
            .filter_map(|p| p.detail.as_deref().or(p.title.as_deref()))
            .collect();
        if parts.is_empty() {
            "unspecified API error".to_owned()
        } else {
            parts.join("; ")
        }
    }
}

fn account_from_response(handle: &str, response: UserResponse) -> Result<Account, CuratorError> {
    let Some(user) = response.data else {
        return Err(CuratorError::Api(format!(
            "user {handle} not found: {}",
            ApiProblem::describe(&response.errors)
        )));
    };

    let user_id = user.id.parse::<u64>().map_err(|e| {
        CuratorError::Api(format!("user {handle} has non-numeric id {:?}: {e}", user.id))
    })?;

    Ok(Account {
        name: user.name,
        user_id,
        username: user.username,
    })
}

fn posts_from_response(response: TimelineResponse) -> Result<Vec<FetchedPost>, CuratorError> {
    if response.data.is_empty() && !response.errors.is_empty() {
        return Err(CuratorError::Api(ApiProblem::describe(&response.errors)));
    }

    Ok(response
        .data
        .into_iter()
        .map(|t| FetchedPost {
            id: t.id,
            text: t.text,
            retweets: t.public_metrics.retweet_count,
            likes: t.public_metrics.like_count,
        })
        .collect())
}

/// How long to sleep after a 429: until the reset instant plus one second.
fn rate_limit_wait(headers: &HeaderMap, now_epoch_secs: i64) -> Duration {
    let reset = headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok());

    reset.map_or(FALLBACK_RATE_LIMIT_WAIT, |reset| {
        let remaining = u64::try_from(reset.saturating_sub(now_epoch_secs)).unwrap_or(0);
        Duration::from_secs(remaining.saturating_add(1))
    })
}
