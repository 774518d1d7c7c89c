//! Scan Core - Post/Trade Correlation Engine
//!
//! This module provides the infrastructure for one scan cycle: fetch recent
//! posts from a tracked account, fetch recent token transfers from a tracked
//! wallet, correlate trades to nearby-in-time posts, and persist the batch.
//!
//! # Architecture
//!
//! ```text
//! PostSource ──┐
//!              ├→ CorrelationEngine (±match_window timestamp join)
//! TradeSource ─┘        ↓
//!                  ActivityStore (INSERT OR IGNORE, one transaction per batch)
//!                       ↓
//!                  ScanSummary → caller
//! ```

pub mod correlator;
pub mod post_source;
pub mod scanner;
pub mod sqlite_store;
pub mod trade_source;
pub mod types;

pub use correlator::CorrelationEngine;
pub use post_source::{collect_recent, HttpPostSource, PostSource};
pub use scanner::{ScanError, ScanSettings, ScanSummary, Scanner};
pub use sqlite_store::{ActivityStore, StoreError};
pub use trade_source::{
    fetch_recent_trades, HttpTradeSource, SplTransfer, TradeSource, DEFAULT_TOKEN_DECIMALS,
    TRANSFER_PAGE_LIMIT,
};
pub use types::{Post, SourceError, TradeEvent};
