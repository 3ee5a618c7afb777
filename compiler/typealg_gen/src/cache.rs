//! Per-key at-most-once memoization.

use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

/// Concurrent map whose values are each computed at most once.
///
/// Every key owns a `OnceLock`. The shard lock is held only long enough to
/// fetch (or insert) that cell, so unrelated keys never wait on each other
/// and an initializer may recursively request other keys. Racers on the
/// same key block on the cell and then observe the winner's value.
pub struct OnceMap<K, V> {
    cells: DashMap<K, Arc<OnceLock<V>>, FxBuildHasher>,
}

impl<K: Eq + Hash + Clone, V: Clone> OnceMap<K, V> {
    pub fn new() -> Self {
        OnceMap {
            cells: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Value for `key`, running `init` if no other caller has.
    pub fn get_or_create(&self, key: K, init: impl FnOnce() -> V) -> V {
        let cell = self.cell(key);
        cell.get_or_init(init).clone()
    }

    /// Completed value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        let cell = self.cells.get(key).map(|c| Arc::clone(&c))?;
        cell.get().cloned()
    }

    /// Number of keys that have been requested.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Snapshot of all completed values, in no particular order.
    pub fn values(&self) -> Vec<V> {
        self.cells
            .iter()
            .filter_map(|entry| entry.value().get().cloned())
            .collect()
    }

    fn cell(&self, key: K) -> Arc<OnceLock<V>> {
        if let Some(cell) = self.cells.get(&key) {
            return Arc::clone(&cell);
        }
        Arc::clone(&self.cells.entry(key).or_default())
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for OnceMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
