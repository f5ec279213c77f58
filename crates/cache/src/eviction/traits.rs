//! Boundary between the eviction engine and the cache that hosts it

use crate::metrics::MetricsSnapshot;
use std::fmt::Debug;
use std::hash::Hash;

/// A handle to one entry of the host cache.
///
/// Handles are cheap to clone (typically an `Arc`) and are stored in the
/// tracking index, so they must outlive the notification that produced
/// them. Two handles refer to the same entry iff their `id`s are equal.
///
/// Hosts must make `is_cached` return `false` before delivering the
/// removal notification for an entry.
pub trait EvictableEntry: Clone + Send + Sync + 'static {
    /// Identity of the entry, stable for its whole lifetime
    type Id: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    /// Value type the priority is derived from
    type Value: 'static;

    fn id(&self) -> Self::Id;

    /// Non-blocking local read; `None` once the entry is gone
    fn peek_value(&self) -> Option<Self::Value>;

    /// Whether the handle still refers to a live entry of the cache
    fn is_cached(&self) -> bool;

    /// Try to evict this entry now. The host may refuse, for example when
    /// the entry is locked.
    fn evict(&self) -> bool;
}

/// Eviction policy driven by entry notifications from the host cache
pub trait EvictionPolicy<E: EvictableEntry>: Send + Sync {
    /// Called for every insert, update and removal of an entry.
    /// `removed` is true when the entry has left the cache.
    fn on_entry_accessed(&self, removed: bool, entry: &E);

    /// Number of entries currently tracked
    fn tracked(&self) -> u64;

    /// Upper bound on tracked entries before a sweep runs
    fn max_size(&self) -> u64;

    /// Drop all tracking data
    fn clear(&self);

    /// Current metrics of this policy
    fn snapshot(&self) -> MetricsSnapshot;
}
