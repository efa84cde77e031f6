use std::collections::BTreeMap;

use crate::traits::{Inspect, NamespaceInfo, StateStore, StoreInfo};

/// In-memory storage backend.
///
/// All data lives in a `BTreeMap`; nothing touches disk. Used as the
/// in-process fake in tests and for throwaway boards.
///
/// # Example
///
/// ```
/// use feedback_store::{MemoryStore, StateStore};
///
/// let mut store = MemoryStore::new();
/// store.put("feedback", "board", b"{}").unwrap();
///
/// let data = store.get("feedback", "board").unwrap().unwrap();
/// assert_eq!(data, b"{}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// (namespace, key) -> value
    state: BTreeMap<(String, String), Vec<u8>>,
}

/// Error type for the in-memory backend.
///
/// This backend never actually fails, but the trait requires an error type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("memory store error: {0}")]
pub struct MemoryError(String);

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values across all namespaces.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    fn ns_key(namespace: &str, key: &str) -> (String, String) {
        (namespace.to_string(), key.to_string())
    }
}

impl StateStore for MemoryStore {
    type Error = MemoryError;

    fn put(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.state
            .insert(Self::ns_key(namespace, key), value.to_vec());
        Ok(())
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.state.get(&Self::ns_key(namespace, key)).cloned())
    }

    fn exists(&self, namespace: &str, key: &str) -> Result<bool, Self::Error> {
        Ok(self.state.contains_key(&Self::ns_key(namespace, key)))
    }
}

impl Inspect for MemoryStore {
    fn store_info(&self) -> Result<StoreInfo, Self::Error> {
        let mut ns_map: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for ((ns, _), value) in &self.state {
            let entry = ns_map.entry(ns.as_str()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += value.len() as u64;
        }

        let namespaces = ns_map
            .into_iter()
            .map(|(name, (entry_count, total_bytes))| NamespaceInfo {
                name: name.to_string(),
                entry_count,
                total_bytes,
            })
            .collect();
        Ok(StoreInfo::from_namespaces(namespaces))
    }
}
