//! Priority eviction for bounded in-memory caches
//!
//! This crate provides:
//! - A lock-free, size-bounded eviction policy ordered by a user supplied
//!   priority, with oldest-first tie breaking
//! - The boundary traits a host cache implements to drive it
//! - Eviction metrics and configuration loading
//! - A small in-memory host cache used by tests and the `evictor` binary

pub mod config;
pub mod errors;
pub mod eviction;
pub mod local;
pub mod metrics;

pub use config::{ConfigSource, EvictionConfig, EvictionConfigBuilder, EvictionConfigLoader};
pub use errors::{Error, EvictorError, RecoveryHint, Result};
pub use eviction::*;
pub use local::{LocalCache, LocalEntry, LocalHandle, SharedPolicy};
pub use metrics::{EvictionMetrics, MetricsSnapshot};
