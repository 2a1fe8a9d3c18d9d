//! Sharded concurrent key-value store
//!
//! Backed by a [`DashMap`], so writers to different keys proceed in parallel
//! while a write to a single key is atomic. No lock guard ever escapes this
//! module: reads hand out clones.

use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
pub struct Store<V> {
    entries: DashMap<String, V>,
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V: Clone> Store<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: HashMap<String, V>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Inserts or overwrites `key`, returning the previous value
    pub fn put(&self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    pub fn delete(&self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// Applies `f` to the entry under its shard lock and returns the result
    ///
    /// Returns None if the key is absent. `f` must not touch this store.
    pub fn update<F>(&self, key: &str, f: F) -> Option<V>
    where
        F: FnOnce(&mut V),
    {
        let mut entry = self.entries.get_mut(key)?;
        f(entry.value_mut());
        Some(entry.value().clone())
    }

    /// Point-in-time copy of all entries, ordered by key
    pub fn snapshot(&self) -> BTreeMap<String, V> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
