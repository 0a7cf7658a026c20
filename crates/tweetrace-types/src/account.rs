//! Author metadata written to `users.json`.

use serde::{Deserialize, Serialize};

/// An account whose posts were considered for curation.
///
/// Rebuilt from the social API on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Display name.
    pub name: String,
    /// Numeric platform identifier.
    pub user_id: u64,
    /// Handle without the leading `@`.
    pub username: String,
}

impl Account {
    /// Public permalink for one of this account's posts.
    pub fn post_link(&self, post_id: &str) -> String {
        format!("https://twitter.com/{}/status/{post_id}", self.username)
    }
}
