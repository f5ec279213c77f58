//! Priority eviction policy: lowest priority goes first, oldest first among equals

use crate::config::EvictionConfig;
use crate::eviction::index::TrackingIndex;
use crate::eviction::key::{PolicyKey, SequenceGenerator};
use crate::eviction::slots::EntrySlots;
use crate::eviction::traits::{EvictableEntry, EvictionPolicy};
use crate::metrics::{EvictionMetrics, MetricsSnapshot};
use std::fmt::{self, Debug};
use tracing::{debug, trace};

/// Size-bounded eviction policy ordered by a user supplied priority.
///
/// Runs inline on whichever threads deliver notifications. There is no
/// lock around the whole operation: the index and its counter are
/// lock-free, and the per-entry slot is the only point where two threads
/// working on the same entry are serialized.
///
/// The bound is approximate. While other threads are between inserting a
/// key and rolling it back, the tracked count can briefly exceed
/// `max_size`.
pub struct PriorityEvictionPolicy<E, P, F>
where
    E: EvictableEntry,
{
    max_size: u64,
    priority_of: F,
    sequence: SequenceGenerator,
    index: TrackingIndex<P, E>,
    slots: EntrySlots<E::Id, P>,
    metrics: EvictionMetrics,
}

/// Policy that ignores values and evicts in tracking order
pub type FifoEvictionPolicy<E> =
    PriorityEvictionPolicy<E, (), fn(&<E as EvictableEntry>::Value)>;

impl<E> FifoEvictionPolicy<E>
where
    E: EvictableEntry,
{
    pub fn fifo(config: &EvictionConfig) -> Self {
        fn unit<V>(_: &V) {}
        Self::new(config, unit::<E::Value> as fn(&E::Value))
    }
}

impl<E, P, F> PriorityEvictionPolicy<E, P, F>
where
    E: EvictableEntry,
    P: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&E::Value) -> P + Send + Sync,
{
    pub fn new(config: &EvictionConfig, priority_of: F) -> Self {
        Self {
            max_size: config.max_size,
            priority_of,
            sequence: SequenceGenerator::new(),
            index: TrackingIndex::new(),
            slots: EntrySlots::new(),
            metrics: EvictionMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &EvictionMetrics {
        &self.metrics
    }

    /// Tracked entries in eviction order
    pub fn eviction_order(&self) -> Vec<(PolicyKey<P>, E)> {
        self.index.first_entries().collect()
    }

    /// Key an entry is currently tracked under
    pub fn key_of(&self, entry: &E) -> Option<PolicyKey<P>> {
        self.slots.get(&entry.id())
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> &TrackingIndex<P, E> {
        &self.index
    }

    fn on_removed(&self, entry: &E) {
        let id = entry.id();
        let Some(key) = self.slots.get(&id) else {
            return;
        };

        if self.index.remove_if_matches(&key, entry) {
            self.metrics.record_untracked();
            trace!(entry = ?id, "Untracked removed entry");
        }
        self.slots.remove_if(&id, &key);
    }

    fn on_accessed(&self, entry: &E) {
        let Some(value) = entry.peek_value() else {
            self.metrics.record_skipped_dead();
            return;
        };

        let key = PolicyKey::new((self.priority_of)(&value), self.sequence.next());
        let id = entry.id();

        self.index.insert_if_absent(key.clone(), entry.clone());

        // Another thread already tracks this entry, or the entry left the
        // cache while we were inserting. Undo our binding either way.
        let lost_race = self.slots.put_if_absent(id.clone(), key.clone()).is_some();
        if lost_race || !entry.is_cached() {
            self.index.remove_if_matches(&key, entry);
            if !lost_race {
                self.slots.remove_if(&id, &key);
            }
            self.metrics.record_rollback();
            trace!(entry = ?id, lost_race, "Rolled back tracking");
            return;
        }

        self.metrics.record_tracked();

        if self.overflow() > 0 {
            self.sweep();
        }
    }

    fn overflow(&self) -> u64 {
        self.index.approximate_size().saturating_sub(self.max_size)
    }

    /// Evict from the low end of the index until back under the bound or
    /// out of candidates. Refusals are skipped, never retried.
    fn sweep(&self) {
        self.metrics.record_sweep();

        for (key, entry) in self.index.first_entries() {
            if entry.evict() {
                self.index.remove_if_matches(&key, &entry);
                // `key` can be a binding pending rollback; the slot then
                // names another live key for the same entry.
                self.slots.remove_if(&entry.id(), &key);
                self.on_removed(&entry);
                self.metrics.record_eviction();
                debug!(
                    priority = ?key.priority(),
                    sequence = key.sequence(),
                    "Evicted entry"
                );
            } else {
                self.metrics.record_refusal();
                trace!(entry = ?entry.id(), "Eviction refused");
            }

            if self.overflow() == 0 {
                return;
            }
        }
    }
}

impl<E, P, F> EvictionPolicy<E> for PriorityEvictionPolicy<E, P, F>
where
    E: EvictableEntry,
    P: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&E::Value) -> P + Send + Sync,
{
    fn on_entry_accessed(&self, removed: bool, entry: &E) {
        if removed {
            self.on_removed(entry);
        } else {
            self.on_accessed(entry);
        }
    }

    fn tracked(&self) -> u64 {
        self.index.approximate_size()
    }

    fn max_size(&self) -> u64 {
        self.max_size
    }

    fn clear(&self) {
        self.index.clear();
        self.slots.clear();
    }

    fn snapshot(&self) -> MetricsSnapshot {
        self.metrics
            .snapshot(self.index.approximate_size(), self.max_size)
    }
}

impl<E, P, F> fmt::Debug for PriorityEvictionPolicy<E, P, F>
where
    E: EvictableEntry,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityEvictionPolicy")
            .field("max_size", &self.max_size)
            .field("index", &self.index)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
