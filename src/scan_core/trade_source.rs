//! Trade collection from the tracked wallet
//!
//! Consumes a Solscan-style `splTransfers` REST endpoint and normalizes raw
//! transfer records into [`TradeEvent`]s with the token's decimal precision
//! applied exactly once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::FailurePolicy;

use super::types::{SourceError, TradeEvent};

/// Fixed fetch page size; no pagination beyond this.
pub const TRANSFER_PAGE_LIMIT: u32 = 20;

/// Decimal precision assumed when the wire record omits `decimals`.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Raw transfer record as returned by the upstream endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplTransfer {
    pub signature: String,
    #[serde(rename = "blockTime")]
    pub block_time: i64,
    #[serde(rename = "tokenSymbol")]
    pub token_symbol: String,
    #[serde(rename = "changeAmount")]
    pub change_amount: f64,
    pub decimals: Option<u8>,
}

impl SplTransfer {
    /// Normalize into a [`TradeEvent`], scaling the raw change amount by
    /// `10^decimals`. Returns `None` for an out-of-range block time.
    pub fn normalize(&self) -> Option<TradeEvent> {
        let timestamp = DateTime::from_timestamp(self.block_time, 0)?;
        let decimals = self.decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS);

        Some(TradeEvent {
            id: self.signature.clone(),
            timestamp,
            token: self.token_symbol.clone(),
            amount: self.change_amount / 10f64.powi(decimals as i32),
            matched_post_id: None,
        })
    }
}

/// External transfer feed for a single wallet.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Fetch up to [`TRANSFER_PAGE_LIMIT`] of the wallet's most recent
    /// transfers.
    async fn recent_transfers(&self, wallet: &str) -> Result<Vec<SplTransfer>, SourceError>;
}

/// HTTP-backed transfer feed (Solscan public API shape).
pub struct HttpTradeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTradeSource {
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
impl TradeSource for HttpTradeSource {
    async fn recent_transfers(&self, wallet: &str) -> Result<Vec<SplTransfer>, SourceError> {
        let url = format!(
            "{}/account/splTransfers?account={}&limit={}",
            self.base_url, wallet, TRANSFER_PAGE_LIMIT
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Degraded(format!(
                "transfer API returned {}",
                response.status()
            )));
        }

        let transfers: Vec<SplTransfer> = response.json().await?;
        log::debug!("Fetched {} transfers for {}", transfers.len(), wallet);

        Ok(transfers)
    }
}

/// Fetch, filter to `timestamp >= cutoff`, and normalize the wallet's recent
/// transfers.
///
/// A [`SourceError::Degraded`] failure is handled per `policy`: `Degrade`
/// logs a warning and yields an empty set so the scan continues with zero
/// trades; `Strict` surfaces the error. Transport-level failures
/// ([`SourceError::Unavailable`]) always propagate.
pub async fn fetch_recent_trades(
    source: &dyn TradeSource,
    wallet: &str,
    cutoff: DateTime<Utc>,
    policy: FailurePolicy,
) -> Result<Vec<TradeEvent>, SourceError> {
    let transfers = match source.recent_transfers(wallet).await {
        Ok(transfers) => transfers,
        Err(err @ SourceError::Degraded(_)) => match policy {
            FailurePolicy::Degrade => {
                log::warn!("Trade source degraded, continuing with zero trades: {}", err);
                return Ok(Vec::new());
            }
            FailurePolicy::Strict => return Err(err),
        },
        Err(err) => return Err(err),
    };

    Ok(transfers
        .iter()
        .filter_map(SplTransfer::normalize)
        .filter(|trade| trade.timestamp >= cutoff)
        .collect())
}
