//! Pure-Rust key-value backend using [`redb`](https://docs.rs/redb).
//!
//! No C dependencies, for builds that cannot compile SQLite.
//!
//! Enable with `features = ["redb"]`.
//!
//! ```no_run
//! use feedback_store::{RedbStore, StateStore};
//!
//! let mut store = RedbStore::open("/tmp/feedback.redb").unwrap();
//! store.put("feedback", "feedback-store", b"{}").unwrap();
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::traits::{Inspect, NamespaceInfo, StateStore, StoreInfo};

const STATE_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("board_state");

/// Errors returned by [`RedbStore`] operations.
#[derive(Debug, thiserror::Error)]
#[error("redb error: {0}")]
pub struct RedbError(String);

fn err(e: impl std::fmt::Display) -> RedbError {
    RedbError(e.to_string())
}

/// A pure-Rust persistence backend built on [`redb`].
///
/// Each write runs in its own redb transaction.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RedbError> {
        let db = Database::create(path).map_err(err)?;
        Self::ensure_table(db)
    }

    /// Create an in-memory redb database (for testing).
    pub fn open_in_memory() -> Result<Self, RedbError> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(err)?;
        Self::ensure_table(db)
    }

    fn ensure_table(db: Database) -> Result<Self, RedbError> {
        let txn = db.begin_write().map_err(err)?;
        txn.open_table(STATE_TABLE).map_err(err)?;
        txn.commit().map_err(err)?;
        Ok(Self { db })
    }
}

impl StateStore for RedbStore {
    type Error = RedbError;

    fn put(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), RedbError> {
        let txn = self.db.begin_write().map_err(err)?;
        {
            let mut table = txn.open_table(STATE_TABLE).map_err(err)?;
            table
                .insert(state_key(namespace, key).as_slice(), value)
                .map_err(err)?;
        }
        txn.commit().map_err(err)?;
        Ok(())
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, RedbError> {
        let txn = self.db.begin_read().map_err(err)?;
        let table = txn.open_table(STATE_TABLE).map_err(err)?;
        let value = table
            .get(state_key(namespace, key).as_slice())
            .map_err(err)?
            .map(|guard| guard.value().to_vec());
        Ok(value)
    }
}

impl Inspect for RedbStore {
    fn store_info(&self) -> Result<StoreInfo, RedbError> {
        let txn = self.db.begin_read().map_err(err)?;
        let table = txn.open_table(STATE_TABLE).map_err(err)?;

        let mut ns_map: BTreeMap<String, (u64, u64)> = BTreeMap::new();
        for item in table.iter().map_err(err)? {
            let (key_guard, value_guard) = item.map_err(err)?;
            if let Some((ns, _)) = parse_state_key(key_guard.value()) {
                let entry = ns_map.entry(ns.to_string()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += value_guard.value().len() as u64;
            }
        }

        let namespaces = ns_map
            .into_iter()
            .map(|(name, (entry_count, total_bytes))| NamespaceInfo {
                name,
                entry_count,
                total_bytes,
            })
            .collect();
        Ok(StoreInfo::from_namespaces(namespaces))
    }
}

/// `namespace \0 key`
fn state_key(namespace: &str, key: &str) -> Vec<u8> {
    let mut k = Vec::with_capacity(namespace.len() + 1 + key.len());
    k.extend_from_slice(namespace.as_bytes());
    k.push(0);
    k.extend_from_slice(key.as_bytes());
    k
}

fn parse_state_key(key: &[u8]) -> Option<(&str, &str)> {
    let pos = key.iter().position(|&b| b == 0)?;
    let ns = std::str::from_utf8(&key[..pos]).ok()?;
    let k = std::str::from_utf8(&key[pos + 1..]).ok()?;
    Some((ns, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_store() -> RedbStore {
        RedbStore::open_in_memory().unwrap()
    }

    #[test]
    fn state_put_get_overwrite() {
        let mut store = new_store();
        assert_eq!(store.get("ns", "k1").unwrap(), None);

        store.put("ns", "k1", b"hello").unwrap();
        assert_eq!(store.get("ns", "k1").unwrap(), Some(b"hello".to_vec()));

        store.put("ns", "k1", b"world").unwrap();
        assert_eq!(store.get("ns", "k1").unwrap(), Some(b"world".to_vec()));
    }

    #[test]
    fn state_exists() {
        let mut store = new_store();
        assert!(!store.exists("ns", "k1").unwrap());
        store.put("ns", "k1", b"val").unwrap();
        assert!(store.exists("ns", "k1").unwrap());
    }

    #[test]
    fn state_namespace_isolation() {
        let mut store = new_store();
        store.put("a", "k", b"1").unwrap();
        store.put("b", "k", b"2").unwrap();
        assert_eq!(store.get("a", "k").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get("b", "k").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn info_counts() {
        let mut store = new_store();
        store.put("feedback", "board", b"1234").unwrap();
        store.put("feedback", "old", b"12").unwrap();
        store.put("prefs", "ui", b"1").unwrap();

        let info = store.store_info().unwrap();
        assert_eq!(info.total_entries, 3);
        assert_eq!(info.namespaces.len(), 2);
        assert_eq!(info.namespaces[0].name, "feedback");
        assert_eq!(info.namespaces[0].total_bytes, 6);
        assert_eq!(info.namespaces[1].entry_count, 1);
    }

    #[test]
    fn open_file_based() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.redb");
        {
            let mut store = RedbStore::open(&path).unwrap();
            store.put("ns", "k", b"value").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("ns", "k").unwrap(), Some(b"value".to_vec()));
    }
}
