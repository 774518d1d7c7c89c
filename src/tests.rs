#[cfg(test)]
mod tests {
    use crate::config::{FailurePolicy, MatchStrategy};
    use crate::scan_core::{
        collect_recent, fetch_recent_trades, CorrelationEngine, Post, SourceError, SplTransfer,
        TradeSource,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, TimeDelta, Utc};

    struct StaticTradeSource {
        transfers: Vec<SplTransfer>,
    }

    #[async_trait]
    impl TradeSource for StaticTradeSource {
        async fn recent_transfers(&self, _wallet: &str) -> Result<Vec<SplTransfer>, SourceError> {
            Ok(self.transfers.clone())
        }
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    /// Full pure-path flow: raw transfers through normalization, cutoff
    /// collection, and correlation.
    #[tokio::test]
    async fn test_fetch_and_correlate_flow() {
        let post_time = ts("2024-01-01T10:00:00Z");
        let now = ts("2024-01-01T10:30:00Z");

        let posts = collect_recent(
            vec![Post {
                id: "p1".to_string(),
                timestamp: post_time,
                author: "tracked".to_string(),
                content: "new bag incoming".to_string(),
            }],
            now - TimeDelta::minutes(60),
        );
        assert_eq!(posts.len(), 1);

        let source = StaticTradeSource {
            transfers: vec![
                SplTransfer {
                    signature: "t1".to_string(),
                    block_time: ts("2024-01-01T10:20:00Z").timestamp(),
                    token_symbol: "BONK".to_string(),
                    change_amount: 1_500_000.0,
                    decimals: Some(6),
                },
                SplTransfer {
                    signature: "t2".to_string(),
                    block_time: ts("2024-01-01T09:45:00Z").timestamp(),
                    token_symbol: "WIF".to_string(),
                    change_amount: 3_000_000.0,
                    decimals: None,
                },
            ],
        };

        let trades = fetch_recent_trades(
            &source,
            "wallet",
            now - TimeDelta::minutes(60),
            FailurePolicy::Degrade,
        )
        .await
        .unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].amount, 1.5);
        assert_eq!(trades[1].amount, 3.0); // defaulted to 6 decimals

        let engine = CorrelationEngine::new(1800, MatchStrategy::First);
        let matches = engine.correlate(&posts, &trades);

        // t1 is 1200s from p1, t2 is 900s from p1, both match
        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|t| t.matched_post_id.as_deref() == Some("p1")));
    }

    /// Lookback and match window interact: a trade can survive the lookback
    /// filter yet still fall outside the match window.
    #[tokio::test]
    async fn test_lookback_survivor_outside_match_window() {
        let now = ts("2024-01-01T12:10:00Z");

        let posts = vec![Post {
            id: "p1".to_string(),
            timestamp: ts("2024-01-01T10:00:00Z"),
            author: "tracked".to_string(),
            content: "gm".to_string(),
        }];

        let source = StaticTradeSource {
            transfers: vec![SplTransfer {
                signature: "t2".to_string(),
                block_time: ts("2024-01-01T12:00:00Z").timestamp(),
                token_symbol: "BONK".to_string(),
                change_amount: 1_000_000.0,
                decimals: Some(6),
            }],
        };

        let trades = fetch_recent_trades(
            &source,
            "wallet",
            now - TimeDelta::minutes(60),
            FailurePolicy::Degrade,
        )
        .await
        .unwrap();
        assert_eq!(trades.len(), 1);

        // 7200s from p1, well past the 1800s window
        let engine = CorrelationEngine::new(1800, MatchStrategy::First);
        assert!(engine.correlate(&posts, &trades).is_empty());
    }
}
