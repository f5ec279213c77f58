//! Eviction policy implementations

mod priority;

pub use priority::{FifoEvictionPolicy, PriorityEvictionPolicy};
