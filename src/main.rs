//! postflow - Post/Trade Correlation Scanner
//!
//! Runs one scan cycle over the tracked account and wallet, then exits.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! ## Environment Variables
//!
//! - TRACKED_ACCOUNT - Social account to follow (required)
//! - TRACKED_WALLET - Wallet address to follow (required)
//! - POST_API_URL - Posts JSON endpoint base URL (required)
//! - TRADE_API_URL - Transfers endpoint base URL (default: https://public-api.solscan.io)
//! - POST_LOOKBACK_MINUTES - Post fetch lookback (default: 60)
//! - TRADE_LOOKBACK_MINUTES - Trade fetch lookback (default: 60)
//! - MATCH_WINDOW_SECS - Correlation window in seconds (default: 1800)
//! - POSTFLOW_DB_PATH - SQLite database path (default: data/postflow.db)
//! - TRADE_SOURCE_POLICY - degrade | strict (default: degrade)
//! - MATCH_STRATEGY - first | nearest (default: first)
//! - RUST_LOG - Logging level (optional, default: info)

#[cfg(test)]
mod tests;

pub mod config;
pub mod scan_core;

use config::Config;
use scan_core::{
    ActivityStore, CorrelationEngine, HttpPostSource, HttpTradeSource, ScanSettings, Scanner,
};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    log::info!("🚀 Starting postflow scan");
    log::info!("   Tracked account: @{}", config.tracked_account);
    log::info!("   Tracked wallet: {}", config.tracked_wallet);
    log::info!("   Post lookback: {}m", config.post_lookback_minutes);
    log::info!("   Trade lookback: {}m", config.trade_lookback_minutes);
    log::info!("   Match window: {}s", config.match_window_secs);
    log::info!("   Match strategy: {:?}", config.match_strategy);
    log::info!("   Trade source policy: {:?}", config.trade_source_policy);
    log::info!("   Database: {}", config.db_path);

    let post_source = HttpPostSource::new(&config.post_api_url)?;
    let trade_source = HttpTradeSource::new(&config.trade_api_url)?;
    let store = ActivityStore::open(&config.db_path)?;
    let correlator = CorrelationEngine::new(config.match_window_secs, config.match_strategy);

    let settings = ScanSettings {
        tracked_account: config.tracked_account,
        tracked_wallet: config.tracked_wallet,
        post_lookback_minutes: config.post_lookback_minutes,
        trade_lookback_minutes: config.trade_lookback_minutes,
        trade_source_policy: config.trade_source_policy,
    };

    let mut scanner = Scanner::new(post_source, trade_source, store, correlator, settings);

    let summary = scanner.run_scan().await?;

    log::info!(
        "✅ Scanned {} posts, {} trades, {} matches found",
        summary.posts_fetched,
        summary.trades_fetched,
        summary.matches.len()
    );

    if summary.matches.is_empty() {
        log::info!("No matched trades in this time window");
    } else {
        for trade in &summary.matches {
            log::info!(
                "🎯 {} {} {:+.6} at {} matched post {}",
                trade.id,
                trade.token,
                trade.amount,
                trade.timestamp.to_rfc3339(),
                trade.matched_post_id.as_deref().unwrap_or("?")
            );
        }
    }

    Ok(())
}
