//! Scan cycle orchestration
//!
//! One scan runs to completion before another may start: fetch posts, fetch
//! trades, correlate, persist the batch, report. There is no background
//! scheduling and no retry, the caller re-triggers manually.

use chrono::{TimeDelta, Utc};

use crate::config::FailurePolicy;

use super::correlator::CorrelationEngine;
use super::post_source::{collect_recent, PostSource};
use super::sqlite_store::{ActivityStore, StoreError};
use super::trade_source::{fetch_recent_trades, TradeSource};
use super::types::{SourceError, TradeEvent};

#[derive(Debug)]
pub enum ScanError {
    Source(SourceError),
    Store(StoreError),
}

impl From<SourceError> for ScanError {
    fn from(err: SourceError) -> Self {
        ScanError::Source(err)
    }
}

impl From<StoreError> for ScanError {
    fn from(err: StoreError) -> Self {
        ScanError::Store(err)
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Source(e) => write!(f, "Scan aborted: {}", e),
            ScanError::Store(e) => write!(f, "Persistence failure: {}", e),
        }
    }
}

impl std::error::Error for ScanError {}

/// Result of one scan cycle, returned in-memory to the caller.
///
/// Display never re-queries storage; `matches` is the authoritative output
/// of this cycle.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub posts_fetched: usize,
    pub trades_fetched: usize,
    pub matches: Vec<TradeEvent>,
}

/// Fixed per-scanner settings (one tracked account, one tracked wallet).
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub tracked_account: String,
    pub tracked_wallet: String,
    pub post_lookback_minutes: i64,
    pub trade_lookback_minutes: i64,
    pub trade_source_policy: FailurePolicy,
}

pub struct Scanner<P: PostSource, T: TradeSource> {
    post_source: P,
    trade_source: T,
    store: ActivityStore,
    correlator: CorrelationEngine,
    settings: ScanSettings,
}

impl<P: PostSource, T: TradeSource> Scanner<P, T> {
    pub fn new(
        post_source: P,
        trade_source: T,
        store: ActivityStore,
        correlator: CorrelationEngine,
        settings: ScanSettings,
    ) -> Self {
        Self {
            post_source,
            trade_source,
            store,
            correlator,
            settings,
        }
    }

    /// Run one scan cycle: fetch → correlate → persist → report.
    ///
    /// A post source failure aborts before anything is persisted. A trade
    /// source failure follows the configured policy. A persistence failure
    /// rolls back the current batch; committed rows from earlier scans
    /// remain, and re-running is safe because inserts are id-keyed no-ops.
    pub async fn run_scan(&mut self) -> Result<ScanSummary, ScanError> {
        let now = Utc::now();

        let post_cutoff = now - TimeDelta::minutes(self.settings.post_lookback_minutes);
        let raw_posts = self
            .post_source
            .recent_posts(&self.settings.tracked_account)
            .await?;
        let posts = collect_recent(raw_posts, post_cutoff);
        log::info!(
            "Fetched {} recent posts for @{}",
            posts.len(),
            self.settings.tracked_account
        );

        let trade_cutoff = now - TimeDelta::minutes(self.settings.trade_lookback_minutes);
        let trades = fetch_recent_trades(
            &self.trade_source,
            &self.settings.tracked_wallet,
            trade_cutoff,
            self.settings.trade_source_policy,
        )
        .await?;
        log::info!(
            "Fetched {} recent trades for {}",
            trades.len(),
            self.settings.tracked_wallet
        );

        let matches = self.correlator.correlate(&posts, &trades);

        self.store.persist_batch(&posts, &matches)?;

        Ok(ScanSummary {
            posts_fetched: posts.len(),
            trades_fetched: trades.len(),
            matches,
        })
    }
}
