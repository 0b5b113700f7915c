//! Keyed topology table without implicit entry creation.
//!
//! Tables are filled by explicit `insert` only. Looking up an unknown device
//! or connect point yields `None` from [`SyncMap::get`] or a
//! [`SyncMapError`] naming the key from [`SyncMap::require`], and the table
//! is left untouched either way.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use thiserror::Error;

/// Lookup failure in a [`SyncMap`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncMapError {
    #[error("no entry for '{key}'")]
    KeyNotFound { key: String },
}

/// Topology table keyed by device id or connect point.
///
/// ```
/// use synthtopo_common::SyncMap;
///
/// let mut ports: SyncMap<&str, u32> = SyncMap::new();
/// assert!(ports.require(&"a1").is_err());
/// assert!(ports.is_empty());
///
/// ports.insert("a1", 4);
/// assert_eq!(ports.require(&"a1"), Ok(&4));
/// ```
#[derive(Debug, Clone)]
pub struct SyncMap<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Eq + Hash, V> SyncMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Stores `value` under `key`, returning the entry it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

impl<K: Eq + Hash + Display, V> SyncMap<K, V> {
    /// Like [`get`](Self::get), but a missing key is an error naming it.
    pub fn require(&self, key: &K) -> Result<&V, SyncMapError> {
        self.entries.get(key).ok_or_else(|| missing(key))
    }

    pub fn require_mut(&mut self, key: &K) -> Result<&mut V, SyncMapError> {
        self.entries.get_mut(key).ok_or_else(|| missing(key))
    }
}

impl<K: Eq + Hash + Clone, V: Clone> SyncMap<K, V> {
    /// Owned copy of every entry.
    pub fn snapshot(&self) -> HashMap<K, V> {
        self.entries.clone()
    }
}

impl<K: Eq + Hash, V> Default for SyncMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(key: &impl Display) -> SyncMapError {
    SyncMapError::KeyNotFound {
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_lookup_leaves_table_empty() {
        let mut table: SyncMap<&str, Vec<u32>> = SyncMap::new();

        assert!(table.get(&"a1").is_none());
        assert_eq!(
            table.require(&"a1").unwrap_err(),
            SyncMapError::KeyNotFound {
                key: "a1".to_string()
            }
        );
        assert!(table.require_mut(&"a1").is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_require_mut_updates_in_place() {
        let mut table = SyncMap::new();
        table.insert("a1", vec![1, 2]);

        table.require_mut(&"a1").unwrap().push(3);

        assert_eq!(table.get(&"a1"), Some(&vec![1, 2, 3]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut table = SyncMap::new();
        assert_eq!(table.insert("a1/1", "a2/1"), None);
        assert_eq!(table.insert("a1/1", "a3/1"), Some("a2/1"));
        assert!(table.contains_key(&"a1/1"));

        let snapshot = table.snapshot();
        assert_eq!(table.remove(&"a1/1"), Some("a3/1"));
        assert!(table.is_empty());
        assert_eq!(snapshot.get("a1/1"), Some(&"a3/1"));
    }
}
