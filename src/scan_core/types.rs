//! Core record types shared across the scan pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single post authored by the tracked account.
///
/// Immutable once created; persisted at most once per unique `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub content: String,
}

/// A normalized token transfer observed on the tracked wallet.
///
/// Created by the trade source with `matched_post_id = None`; the correlator
/// sets it exactly once, after which the record is persisted immutably.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub token: String,
    pub amount: f64,
    pub matched_post_id: Option<String>,
}

#[derive(Debug)]
pub enum SourceError {
    /// Source unreachable or returned an error; the scan aborts.
    Unavailable(String),
    /// Source responded with a non-success status; may be degraded to an
    /// empty result depending on the configured failure policy.
    Degraded(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Unavailable(e) => write!(f, "Source unavailable: {}", e),
            SourceError::Degraded(e) => write!(f, "Source degraded: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}
