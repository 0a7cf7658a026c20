//! The account loop: look up, fetch, filter, rank, collect.
//!
//! Accounts are processed strictly one after another. Each account starts
//! from empty state; a failed profile lookup contributes nothing, a failed
//! post fetch contributes the author but no posts.
//!
//! ```text
//! for handle in accounts:
//!     lookup_account --fail--> skip
//!     recent_posts   --fail--> author only
//!     normalize -> filter -> rank desc -> top N
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};
use tweetrace_store::write_json;
use tweetrace_types::{Account, CuratedPost, PopularityMetric};

use crate::config::{CuratorConfig, OutputConfig};
use crate::error::CuratorError;
use crate::filter::{ContentFilter, normalize_text};
use crate::profanity::ProfanityCheck;

/// A post as returned by the API, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPost {
    /// Platform post id.
    pub id: String,
    /// Raw text.
    pub text: String,
    /// Repost count.
    pub retweets: u64,
    /// Like count.
    pub likes: u64,
}

/// Where accounts and their posts come from.
pub trait PostSource {
    /// Resolve a handle to profile metadata.
    fn lookup_account(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Account, CuratorError>> + Send;

    /// Fetch the account's recent original posts.
    fn recent_posts(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Vec<FetchedPost>, CuratorError>> + Send;
}

/// Filtering and ranking policy for one run.
pub struct Pipeline {
    filter: ContentFilter,
    metric: PopularityMetric,
    top_n: usize,
    pause: Option<Duration>,
}

impl Pipeline {
    /// Assemble the pipeline described by `config`.
    pub fn from_config(
        config: &CuratorConfig,
        profanity: Box<dyn ProfanityCheck + Send + Sync>,
    ) -> Self {
        Self {
            filter: ContentFilter::new(&config.filter, profanity),
            metric: config.ranking.metric,
            top_n: config.ranking.top_n,
            pause: config.pacing.pause(),
        }
    }

    /// Normalize, filter, rank and truncate one account's posts.
    pub fn select(&self, account: &Account, posts: Vec<FetchedPost>) -> Vec<CuratedPost> {
        let fetched = posts.len();
        let mut kept: Vec<CuratedPost> = posts
            .into_iter()
            .filter_map(|post| {
                let text = normalize_text(&post.text);
                if let Err(reason) = self.filter.check(&text) {
                    debug!(
                        account = account.username,
                        post_id = post.id,
                        reason = %reason,
                        "post rejected"
                    );
                    return None;
                }
                Some(CuratedPost {
                    author_name: account.name.clone(),
                    author_username: account.username.clone(),
                    link: account.post_link(&post.id),
                    text,
                    popularity: self.metric.measure(post.retweets, post.likes),
                })
            })
            .collect();

        let eligible = kept.len();
        rank_top(&mut kept, self.top_n);
        debug!(
            account = account.username,
            fetched = fetched,
            eligible = eligible,
            kept = kept.len(),
            "posts selected"
        );
        kept
    }
}

/// Sort descending by popularity and keep the first `top_n`.
///
/// The sort is stable: posts with equal counts keep their fetch order.
pub fn rank_top(posts: &mut Vec<CuratedPost>, top_n: usize) {
    posts.sort_by(|a, b| b.popularity.count().cmp(&a.popularity.count()));
    posts.truncate(top_n);
}

/// Everything one run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationRun {
    /// Authors whose profile lookup succeeded, in processing order.
    pub authors: Vec<Account>,
    /// Curated posts, grouped by account in processing order.
    pub posts: Vec<CuratedPost>,
    /// Handles whose profile lookup failed.
    pub skipped: Vec<String>,
}

impl CurationRun {
    /// Overwrite both output files with this run's results.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::Store`] if either file cannot be written.
    pub fn write(&self, output: &OutputConfig) -> Result<(), CuratorError> {
        write_json(&output.users_path, &self.authors)?;
        write_json(&output.tweets_path, &self.posts)?;
        info!(
            users_path = %output.users_path.display(),
            tweets_path = %output.tweets_path.display(),
            authors = self.authors.len(),
            posts = self.posts.len(),
            "output written"
        );
        Ok(())
    }
}

/// What a single account contributed.
struct AccountResult {
    account: Account,
    posts: Vec<CuratedPost>,
}

/// Process every handle in order and collect the results.
pub async fn curate<S: PostSource>(
    source: &S,
    handles: &[String],
    pipeline: &Pipeline,
) -> CurationRun {
    let mut run = CurationRun::default();
    // Set after a resolved profile; a failed lookup is not followed by a pause.
    let mut pause_pending = false;

    for handle in handles {
        if let Some(pause) = pipeline.pause.filter(|_| pause_pending) {
            tokio::time::sleep(pause).await;
        }

        match process_account(source, handle, pipeline).await {
            Some(result) => {
                info!(
                    account = handle,
                    curated = result.posts.len(),
                    "processed account"
                );
                run.authors.push(result.account);
                run.posts.extend(result.posts);
                pause_pending = true;
            }
            None => {
                run.skipped.push(handle.clone());
                pause_pending = false;
            }
        }
    }

    info!(
        accounts = handles.len(),
        skipped = run.skipped.len(),
        authors = run.authors.len(),
        posts = run.posts.len(),
        "curation finished"
    );
    run
}

/// Look up one handle and select its posts.
///
/// Returns `None` when the profile lookup fails.
async fn process_account<S: PostSource>(
    source: &S,
    handle: &str,
    pipeline: &Pipeline,
) -> Option<AccountResult> {
    let account = match source.lookup_account(handle).await {
        Ok(account) => account,
        Err(e) => {
            warn!(account = handle, error = %e, "profile lookup failed, skipping account");
            return None;
        }
    };

    let posts = match source.recent_posts(&account).await {
        Ok(fetched) => pipeline.select(&account, fetched),
        Err(e) => {
            warn!(account = handle, error = %e, "post fetch failed");
            Vec::new()
        }
    };

    Some(AccountResult { account, posts })
}
