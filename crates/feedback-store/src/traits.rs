use core::fmt;

use serde::{Deserialize, Serialize};

/// Summary of one namespace in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    /// Name of the namespace.
    pub name: String,
    /// Number of keys.
    pub entry_count: u64,
    /// Total size of the stored values in bytes.
    pub total_bytes: u64,
}

/// Summary of an entire store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Number of keys across all namespaces.
    pub total_entries: u64,
    /// Per-namespace breakdown, ordered by name.
    pub namespaces: Vec<NamespaceInfo>,
}

impl StoreInfo {
    /// Build totals from a per-namespace breakdown.
    pub fn from_namespaces(namespaces: Vec<NamespaceInfo>) -> Self {
        Self {
            total_entries: namespaces.iter().map(|n| n.entry_count).sum(),
            namespaces,
        }
    }
}

/// Persistence port: opaque byte values under `(namespace, key)` slots.
///
/// The board writes its whole snapshot into a single slot, so backends only
/// need whole-value `put`/`get`. Values are never interpreted by the store.
pub trait StateStore {
    /// Error type for this backend.
    type Error: fmt::Debug + fmt::Display;

    /// Store a value under `(namespace, key)`, replacing any previous one.
    fn put(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), Self::Error>;

    /// Retrieve a value by `(namespace, key)`.
    /// Returns `None` if the key does not exist.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Check if a key exists in a namespace.
    fn exists(&self, namespace: &str, key: &str) -> Result<bool, Self::Error> {
        Ok(self.get(namespace, key)?.is_some())
    }
}

/// Extension trait for backends that can summarize their contents.
pub trait Inspect: StateStore {
    /// Per-namespace key counts and sizes.
    fn store_info(&self) -> Result<StoreInfo, Self::Error>;
}
