//! Minimal keyed store for caller-chosen keys.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Thread-safe map where the caller owns key assignment.
pub struct MemoryKv<K, V> {
    data: RwLock<BTreeMap<K, V>>,
}

impl<K: Ord, V> Default for MemoryKv<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> MemoryKv<K, V> {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Inserts or replaces the value for `key`, returning the previous one.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value)
    }

    /// Removes `key`. Removing an absent key is not an error.
    pub fn delete(&self, key: &K) -> Option<V> {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord, V: Clone> MemoryKv<K, V> {
    pub fn get(&self, key: &K) -> Option<V> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
