//! Entries of the in-memory reference cache

use crate::eviction::EvictableEntry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

pub(crate) type Store<K, V> = DashMap<K, LocalHandle<K, V>>;

/// Handle type the eviction policy sees
pub type LocalHandle<K, V> = Arc<LocalEntry<K, V>>;

/// One resident value. A fresh entry with a new id is created for every
/// put, so an id is never reused for a different value.
pub struct LocalEntry<K, V> {
    id: u64,
    key: K,
    value: RwLock<Option<V>>,
    created_at: Instant,
    ttl: Option<Duration>,
    pinned: AtomicBool,
    store: Weak<Store<K, V>>,
}

impl<K, V> LocalEntry<K, V>
where
    K: Eq + Hash,
{
    pub(crate) fn new(
        id: u64,
        key: K,
        value: V,
        ttl: Option<Duration>,
        store: Weak<Store<K, V>>,
    ) -> Self {
        Self {
            id,
            key,
            value: RwLock::new(Some(value)),
            created_at: Instant::now(),
            ttl,
            pinned: AtomicBool::new(false),
            store,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn is_expired(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.created_at.elapsed() > ttl)
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.load(Ordering::Acquire)
    }

    pub(crate) fn set_pinned(&self, pinned: bool) {
        self.pinned.store(pinned, Ordering::Release);
    }

    /// Drop the value; the entry stays readable only as a dead handle
    pub(crate) fn take_value(&self) -> Option<V> {
        self.value.write().take()
    }

    /// Whether the map still holds this exact entry
    fn is_resident(&self) -> bool {
        self.store.upgrade().is_some_and(|store| {
            store
                .get(&self.key)
                .is_some_and(|current| current.id == self.id)
        })
    }
}

impl<K, V> EvictableEntry for Arc<LocalEntry<K, V>>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Id = u64;
    type Value = V;

    fn id(&self) -> u64 {
        self.id
    }

    fn peek_value(&self) -> Option<V> {
        if self.is_expired() {
            return None;
        }
        self.value.read().clone()
    }

    fn is_cached(&self) -> bool {
        self.is_resident()
    }

    fn evict(&self) -> bool {
        if self.is_pinned() {
            return false;
        }

        let Some(store) = self.store.upgrade() else {
            return false;
        };

        if store
            .remove_if(&self.key, |_, current| current.id == self.id)
            .is_some()
        {
            self.take_value();
            true
        } else {
            false
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for LocalEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEntry")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .field("pinned", &self.pinned.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
