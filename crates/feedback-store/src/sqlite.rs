//! SQLite persistence backend using rusqlite.
//!
//! The default on-disk backend for the board. Uses WAL mode by default.
//!
//! # Example
//!
//! ```no_run
//! use feedback_store::{SqliteStore, StateStore};
//!
//! let mut store = SqliteStore::open("feedback.db").unwrap();
//! store.put("feedback", "feedback-store", b"{}").unwrap();
//!
//! let data = store.get("feedback", "feedback-store").unwrap().unwrap();
//! assert_eq!(data, b"{}");
//! ```

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::traits::{Inspect, NamespaceInfo, StateStore, StoreInfo};

/// Error type for the SQLite backend.
#[derive(Debug, thiserror::Error)]
pub enum SqliteError {
    /// An error from rusqlite.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// SQLite persistence backend.
///
/// Owns a single `rusqlite::Connection`. Creates the schema on first open.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteError> {
        let conn = Connection::open(path)?;
        Self::init_connection(&conn)?;
        Self::create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self, SqliteError> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(&conn)?;
        Self::create_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_connection(conn: &Connection) -> Result<(), SqliteError> {
        // journal_mode reports the resulting mode as a row, so it is read
        // with query_row instead of being batched with the other pragmas.
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch(
            "PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(())
    }

    fn create_schema(conn: &Connection) -> Result<(), SqliteError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS board_state (
                namespace   TEXT NOT NULL,
                key         TEXT NOT NULL,
                data        BLOB NOT NULL,
                PRIMARY KEY (namespace, key)
            );",
        )?;
        Ok(())
    }
}

impl StateStore for SqliteStore {
    type Error = SqliteError;

    fn put(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO board_state (namespace, key, data)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace, key)
             DO UPDATE SET data = excluded.data",
            params![namespace, key, value],
        )?;
        Ok(())
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let result = self
            .conn
            .query_row(
                "SELECT data FROM board_state WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(result)
    }

    fn exists(&self, namespace: &str, key: &str) -> Result<bool, Self::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM board_state WHERE namespace = ?1 AND key = ?2",
            params![namespace, key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl Inspect for SqliteStore {
    fn store_info(&self) -> Result<StoreInfo, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT namespace, COUNT(*), COALESCE(SUM(LENGTH(data)), 0)
             FROM board_state
             GROUP BY namespace
             ORDER BY namespace",
        )?;
        let namespaces = stmt
            .query_map([], |row| {
                Ok(NamespaceInfo {
                    name: row.get(0)?,
                    entry_count: row.get::<_, i64>(1)? as u64,
                    total_bytes: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StoreInfo::from_namespaces(namespaces))
    }
}
