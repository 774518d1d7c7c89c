//! Post collection from the tracked account
//!
//! The upstream collaborator is abstracted behind [`PostSource`] so the scan
//! cycle can be driven by any feed (HTTP API, scraper bridge, test fixture).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use super::types::{Post, SourceError};

/// External post feed for a single account.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch the account's most recent posts.
    ///
    /// Contract: implementations must yield posts newest-first
    /// (reverse-chronological). [`collect_recent`] relies on this ordering
    /// for its early exit; a violated ordering can only lose qualifying
    /// items past an out-of-order gap, never include out-of-window ones.
    async fn recent_posts(&self, account: &str) -> Result<Vec<Post>, SourceError>;
}

/// Keep posts with `timestamp >= cutoff` from a newest-first sequence.
///
/// Stops consuming at the first item older than the cutoff. This is an
/// optimization over fetch-all-then-filter, not a correctness requirement.
pub fn collect_recent(posts: impl IntoIterator<Item = Post>, cutoff: DateTime<Utc>) -> Vec<Post> {
    let mut recent = Vec::new();

    for post in posts {
        if post.timestamp < cutoff {
            break;
        }
        recent.push(post);
    }

    recent
}

/// HTTP-backed post feed.
///
/// Expects `GET {base}/users/{account}/posts` to return a JSON array of
/// posts, newest-first: `[{"id", "timestamp", "author", "content"}, ...]`.
pub struct HttpPostSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPostSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn recent_posts(&self, account: &str) -> Result<Vec<Post>, SourceError> {
        let url = format!("{}/users/{}/posts", self.base_url, account);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "post API returned {}",
                response.status()
            )));
        }

        let posts: Vec<Post> = response.json().await?;
        log::debug!("Fetched {} posts for @{}", posts.len(), account);

        Ok(posts)
    }
}
