//! Curated posts written to `tweets.json`.
//!
//! A curated post carries exactly one popularity field, named after the
//! metric the run ranked by:
//!
//! ```json
//! {
//!   "tweet_author_name": "NASA",
//!   "tweet_author_username": "NASA",
//!   "tweet_link": "https://twitter.com/NASA/status/1",
//!   "tweet_text": "...",
//!   "tweet_retweets": 812
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Which engagement count a run ranks posts by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopularityMetric {
    /// Rank by repost count.
    #[default]
    Retweets,
    /// Rank by like count.
    Likes,
}

impl PopularityMetric {
    /// Select this metric's value from a post's engagement counts.
    pub const fn measure(self, retweets: u64, likes: u64) -> Popularity {
        match self {
            Self::Retweets => Popularity::Retweets(retweets),
            Self::Likes => Popularity::Likes(likes),
        }
    }
}

/// The engagement value a post was ranked by, tagged with its metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Popularity {
    /// Repost count.
    #[serde(rename = "tweet_retweets")]
    Retweets(u64),
    /// Like count.
    #[serde(rename = "tweet_likes")]
    Likes(u64),
}

impl Popularity {
    /// The raw count, regardless of metric.
    pub const fn count(self) -> u64 {
        match self {
            Self::Retweets(n) | Self::Likes(n) => n,
        }
    }
}

/// A post that survived the content filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedPost {
    /// Display name of the author.
    #[serde(rename = "tweet_author_name")]
    pub author_name: String,
    /// Handle of the author.
    #[serde(rename = "tweet_author_username")]
    pub author_username: String,
    /// Public permalink to the post.
    #[serde(rename = "tweet_link")]
    pub link: String,
    /// ASCII-only text with newlines replaced by spaces.
    #[serde(rename = "tweet_text")]
    pub text: String,
    /// Engagement value used for ranking.
    #[serde(flatten)]
    pub popularity: Popularity,
}
