//! Time-window correlation between trades and posts

use crate::config::MatchStrategy;

use super::types::{Post, TradeEvent};

pub struct CorrelationEngine {
    match_window_secs: i64,
    strategy: MatchStrategy,
}

impl CorrelationEngine {
    pub fn new(match_window_secs: i64, strategy: MatchStrategy) -> Self {
        Self {
            match_window_secs,
            strategy,
        }
    }

    /// Match each trade to a post within `match_window_secs` of its timestamp.
    ///
    /// Pure function over its inputs. For each trade, in input order:
    /// - `First`: attach the first post in input order inside the window,
    ///   not the closest-in-time one.
    /// - `Nearest`: attach the post with the smallest absolute time
    ///   difference inside the window; ties go to the earlier post in input
    ///   order.
    ///
    /// Trades with no qualifying post are dropped from the result. The
    /// nested scan is O(trades × posts), which is fine at the tens of items
    /// per scan this system targets.
    pub fn correlate(&self, posts: &[Post], trades: &[TradeEvent]) -> Vec<TradeEvent> {
        let mut matched = Vec::new();

        for trade in trades {
            let candidate = match self.strategy {
                MatchStrategy::First => posts
                    .iter()
                    .find(|post| self.within_window(trade, post)),
                MatchStrategy::Nearest => posts
                    .iter()
                    .filter(|post| self.within_window(trade, post))
                    .min_by_key(|post| self.delta_secs(trade, post)),
            };

            if let Some(post) = candidate {
                let mut hit = trade.clone();
                hit.matched_post_id = Some(post.id.clone());
                matched.push(hit);
            }
        }

        matched
    }

    fn delta_secs(&self, trade: &TradeEvent, post: &Post) -> i64 {
        (trade.timestamp - post.timestamp).num_seconds().abs()
    }

    fn within_window(&self, trade: &TradeEvent, post: &Post) -> bool {
        self.delta_secs(trade, post) <= self.match_window_secs
    }
}
