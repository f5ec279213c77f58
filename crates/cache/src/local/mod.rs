//! In-memory reference host for the eviction policies
//!
//! `LocalCache` is a deliberately small concurrent map that delivers the
//! notifications an [`EvictionPolicy`] expects. It is what the tests and
//! the `evictor` binary run the engine against.

mod entry;

pub use entry::{LocalEntry, LocalHandle};

use crate::eviction::{EvictableEntry, EvictionPolicy};
use dashmap::DashMap;
use entry::Store;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Policy object shared with a [`LocalCache`]
pub type SharedPolicy<K, V> = Arc<dyn EvictionPolicy<LocalHandle<K, V>>>;

/// Concurrent key/value map that reports every touch to its eviction policy.
///
/// The policy is always called with no map guard held, so it may call back
/// into the entries (`evict`, `is_cached`) from the same thread.
pub struct LocalCache<K, V> {
    store: Arc<Store<K, V>>,
    policy: SharedPolicy<K, V>,
    next_id: AtomicU64,
}

impl<K, V> LocalCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(policy: SharedPolicy<K, V>) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            policy,
            next_id: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> &SharedPolicy<K, V> {
        &self.policy
    }

    /// Insert or replace `key`
    pub fn put(&self, key: K, value: V) {
        self.install(key, value, None);
    }

    /// Insert or replace `key`; the value expires after `ttl`
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.install(key, value, Some(ttl));
    }

    fn install(&self, key: K, value: V, ttl: Option<Duration>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(LocalEntry::new(
            id,
            key.clone(),
            value,
            ttl,
            Arc::downgrade(&self.store),
        ));

        let previous = self.store.insert(key, Arc::clone(&entry));
        if let Some(previous) = previous {
            previous.take_value();
            self.policy.on_entry_accessed(true, &previous);
        }

        trace!(entry = id, "Put entry");
        self.policy.on_entry_accessed(false, &entry);
    }

    /// Read `key`. An expired entry is removed instead.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.store.get(key).map(|e| Arc::clone(e.value()))?;

        if entry.is_expired() {
            self.remove_entry(&entry);
            return None;
        }

        let value = entry.peek_value()?;
        self.policy.on_entry_accessed(false, &entry);
        Some(value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let (_, entry) = self.store.remove(key)?;
        let value = entry.take_value();
        self.policy.on_entry_accessed(true, &entry);
        value
    }

    /// Remove exactly this entry if it is still resident
    fn remove_entry(&self, entry: &LocalHandle<K, V>) -> bool {
        let removed = self
            .store
            .remove_if(entry.key(), |_, current| current.id() == entry.id())
            .is_some();

        if removed {
            entry.take_value();
            self.policy.on_entry_accessed(true, entry);
        }
        removed
    }

    /// Remove every expired entry, returning how many went
    pub fn purge_expired(&self) -> usize {
        let expired: Vec<LocalHandle<K, V>> = self
            .store
            .iter()
            .filter(|e| e.value().is_expired())
            .map(|e| Arc::clone(e.value()))
            .collect();

        let purged = expired
            .iter()
            .filter(|entry| self.remove_entry(entry))
            .count();

        if purged > 0 {
            debug!(purged, "Purged expired entries");
        }
        purged
    }

    /// Make `key` refuse eviction, as a locked entry would
    pub fn pin(&self, key: &K) -> bool {
        self.set_pinned(key, true)
    }

    pub fn unpin(&self, key: &K) -> bool {
        self.set_pinned(key, false)
    }

    fn set_pinned(&self, key: &K, pinned: bool) -> bool {
        match self.store.get(key) {
            Some(entry) => {
                entry.set_pinned(pinned);
                true
            }
            None => false,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn keys(&self) -> Vec<K> {
        self.store.iter().map(|e| e.key().clone()).collect()
    }

    /// Snapshot of live values; does not count as an access
    pub fn values(&self) -> Vec<V> {
        self.entries().into_iter().map(|(_, v)| v).collect()
    }

    /// Snapshot of live key/value pairs; does not count as an access
    pub fn entries(&self) -> Vec<(K, V)> {
        let handles: Vec<LocalHandle<K, V>> =
            self.store.iter().map(|e| Arc::clone(e.value())).collect();

        handles
            .into_iter()
            .filter_map(|h| h.peek_value().map(|v| (h.key().clone(), v)))
            .collect()
    }
}

impl<K, V> fmt::Debug for LocalCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCache")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
