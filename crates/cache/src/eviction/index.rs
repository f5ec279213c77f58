//! Concurrent ordered index of tracked entries

use crate::eviction::key::PolicyKey;
use crate::eviction::traits::EvictableEntry;
use crossbeam_skiplist::SkipMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ordered map from [`PolicyKey`] to entry handle, lowest key first.
///
/// `SkipMap::len` is not cheap and can be stale under concurrent
/// mutation, so the index keeps its own counter. The counter moves only
/// when a structural insert or remove actually happened, which keeps it
/// equal to the number of bindings whenever no call is in flight.
pub struct TrackingIndex<P, E> {
    map: SkipMap<PolicyKey<P>, E>,
    size: AtomicU64,
}

impl<P, E> TrackingIndex<P, E>
where
    P: Ord + Send + 'static,
    E: EvictableEntry,
{
    pub fn new() -> Self {
        Self {
            map: SkipMap::new(),
            size: AtomicU64::new(0),
        }
    }

    /// Bind `key` to `entry` unless `key` is already present.
    ///
    /// Sequence numbers make keys unique, so in practice this always
    /// inserts.
    pub fn insert_if_absent(&self, key: PolicyKey<P>, entry: E) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }

        let id = entry.id();
        let bound = self.map.get_or_insert(key, entry);
        if bound.value().id() != id {
            return false;
        }

        self.size.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// Remove the binding for `key` only if it still points at `entry`.
    ///
    /// Returns false when another thread already removed or replaced it.
    pub fn remove_if_matches(&self, key: &PolicyKey<P>, entry: &E) -> bool {
        let Some(bound) = self.map.get(key) else {
            return false;
        };

        if bound.value().id() != entry.id() {
            return false;
        }

        // `Entry::remove` only succeeds for the thread that unlinks the node.
        if bound.remove() {
            self.size.fetch_sub(1, Ordering::AcqRel);
            true
        } else {
            false
        }
    }

    /// Bindings in ascending key order, i.e. eviction order.
    ///
    /// The iterator is lazy and keeps working while other threads insert or
    /// remove; bindings removed behind the cursor are simply not yielded.
    pub fn first_entries(&self) -> impl Iterator<Item = (PolicyKey<P>, E)> + '_
    where
        P: Clone,
    {
        self.map
            .iter()
            .map(|bound| (bound.key().clone(), bound.value().clone()))
    }

    /// Tracked count from the running counter
    pub fn approximate_size(&self) -> u64 {
        self.size.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.approximate_size() == 0
    }

    /// Remove every binding and reset the counter
    pub fn clear(&self) {
        for bound in self.map.iter() {
            if bound.remove() {
                self.size.fetch_sub(1, Ordering::AcqRel);
            }
        }
    }
}

impl<P, E> Default for TrackingIndex<P, E>
where
    P: Ord + Send + 'static,
    E: EvictableEntry,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, E> fmt::Debug for TrackingIndex<P, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingIndex")
            .field("size", &self.size.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
