//! Priority based eviction for bounded caches
//!
//! The host cache reports every insert, update and removal through
//! [`EvictionPolicy::on_entry_accessed`]; the policy keeps a concurrent
//! ordered index of tracked entries and asks the host to evict the
//! lowest priority ones whenever the bound is exceeded.

mod factory;
mod index;
mod key;
mod policies;
mod slots;
mod traits;

// Re-export public API
pub use factory::{create_eviction_policy, PolicyKind};
pub use index::TrackingIndex;
pub use key::{PolicyKey, SequenceGenerator};
pub use policies::{FifoEvictionPolicy, PriorityEvictionPolicy};
pub use slots::EntrySlots;
pub use traits::{EvictableEntry, EvictionPolicy};

#[cfg(test)]
mod tests;
