//! SQLite persistence for observed posts and matched trades
//!
//! Both tables are append-only and keyed by source-assigned id. Writes use
//! INSERT OR IGNORE, so re-running a scan over the same data is a no-op.

use rusqlite::{params, Connection};
use std::path::Path;

use super::types::{Post, TradeEvent};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Database(rusqlite::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Owned database handle for one scanner instance.
///
/// The connection lives inside the store and is released when the store is
/// dropped at process shutdown; there is no process-wide singleton.
pub struct ActivityStore {
    conn: Connection,
}

impl ActivityStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(StoreError::Database)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(StoreError::Database)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                author TEXT NOT NULL,
                content TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS trades (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                token TEXT NOT NULL,
                amount REAL NOT NULL,
                matched_post_id TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_posts_timestamp ON posts(timestamp DESC)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_trades_timestamp ON trades(timestamp DESC)",
            [],
        )?;

        log::info!("✅ SQLite database initialized with WAL mode");

        Ok(Self { conn })
    }

    /// Insert a post; a duplicate id is a silent no-op, never an overwrite.
    ///
    /// Returns whether a new row was written.
    pub fn upsert_post(&self, post: &Post) -> Result<bool, StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO posts (id, timestamp, author, content)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                post.id,
                post.timestamp.to_rfc3339(),
                post.author,
                post.content,
            ],
        )?;

        Ok(inserted > 0)
    }

    /// Insert a trade; a duplicate id is a silent no-op, never an overwrite.
    ///
    /// Returns whether a new row was written.
    pub fn upsert_trade(&self, trade: &TradeEvent) -> Result<bool, StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO trades (id, timestamp, token, amount, matched_post_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                trade.id,
                trade.timestamp.to_rfc3339(),
                trade.token,
                trade.amount,
                trade.matched_post_id,
            ],
        )?;

        Ok(inserted > 0)
    }

    /// Persist one scan batch in a single transaction.
    ///
    /// Any write failure rolls back the remaining writes of this batch; rows
    /// committed by earlier scans are untouched and a re-run is safe.
    pub fn persist_batch(
        &mut self,
        posts: &[Post],
        matched_trades: &[TradeEvent],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        for post in posts {
            tx.execute(
                "INSERT OR IGNORE INTO posts (id, timestamp, author, content)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    post.id,
                    post.timestamp.to_rfc3339(),
                    post.author,
                    post.content,
                ],
            )?;
        }

        for trade in matched_trades {
            tx.execute(
                "INSERT OR IGNORE INTO trades (id, timestamp, token, amount, matched_post_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    trade.id,
                    trade.timestamp.to_rfc3339(),
                    trade.token,
                    trade.amount,
                    trade.matched_post_id,
                ],
            )?;
        }

        tx.commit()?;

        log::debug!(
            "Persisted batch: {} posts, {} matched trades",
            posts.len(),
            matched_trades.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn create_test_post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            timestamp: Utc::now(),
            author: "tracked".to_string(),
            content: "gm".to_string(),
        }
    }

    fn create_test_trade(id: &str) -> TradeEvent {
        TradeEvent {
            id: id.to_string(),
            timestamp: Utc::now(),
            token: "BONK".to_string(),
            amount: 1.5,
            matched_post_id: Some("p1".to_string()),
        }
    }

    #[test]
    fn test_idempotent_post_insert() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = ActivityStore::open(&db_path).unwrap();

        let post = create_test_post("p1");

        assert!(store.upsert_post(&post).unwrap());
        assert!(!store.upsert_post(&post).unwrap()); // Duplicate

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_duplicate_insert_never_overwrites() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = ActivityStore::open(&db_path).unwrap();

        let original = create_test_post("p1");
        store.upsert_post(&original).unwrap();

        let mut altered = original.clone();
        altered.content = "changed".to_string();
        store.upsert_post(&altered).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let content: String = conn
            .query_row("SELECT content FROM posts WHERE id = 'p1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(content, "gm");
    }

    #[test]
    fn test_idempotent_trade_insert() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = ActivityStore::open(&db_path).unwrap();

        let trade = create_test_trade("t1");

        assert!(store.upsert_trade(&trade).unwrap());
        assert!(!store.upsert_trade(&trade).unwrap());

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_persist_batch_writes_both_tables() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let mut store = ActivityStore::open(&db_path).unwrap();

        let posts = vec![create_test_post("p1"), create_test_post("p2")];
        let trades = vec![create_test_trade("t1")];

        store.persist_batch(&posts, &trades).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let post_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .unwrap();
        let trade_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))
            .unwrap();
        assert_eq!(post_count, 2);
        assert_eq!(trade_count, 1);

        let matched: Option<String> = conn
            .query_row("SELECT matched_post_id FROM trades WHERE id = 't1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(matched.as_deref(), Some("p1"));
    }

    #[test]
    fn test_persist_batch_rerun_is_noop() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let mut store = ActivityStore::open(&db_path).unwrap();

        let posts = vec![create_test_post("p1")];
        let trades = vec![create_test_trade("t1")];

        store.persist_batch(&posts, &trades).unwrap();
        store.persist_batch(&posts, &trades).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let post_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .unwrap();
        let trade_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))
            .unwrap();
        assert_eq!(post_count, 1);
        assert_eq!(trade_count, 1);
    }

    #[test]
    fn test_timestamps_stored_as_rfc3339_text() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = ActivityStore::open(&db_path).unwrap();

        let post = create_test_post("p1");
        store.upsert_post(&post).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let raw: String = conn
            .query_row("SELECT timestamp FROM posts WHERE id = 'p1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(raw, post.timestamp.to_rfc3339());
    }

    #[test]
    fn test_wal_mode_enabled() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let _store = ActivityStore::open(&db_path).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");
    }
}
