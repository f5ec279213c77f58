//! Eviction engine metrics
//!
//! Counters are plain relaxed atomics; they describe what the engine did
//! and are never used to make eviction decisions.

mod snapshot;

pub use snapshot::MetricsSnapshot;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared counters for one eviction policy instance
#[derive(Debug, Clone)]
pub struct EvictionMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    // Tracking
    tracked: AtomicU64,
    untracked: AtomicU64,
    rollbacks: AtomicU64,
    skipped_dead: AtomicU64,

    // Sweeps
    sweeps: AtomicU64,
    evictions: AtomicU64,
    refusals: AtomicU64,

    start_time: Instant,
}

impl EvictionMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                tracked: AtomicU64::new(0),
                untracked: AtomicU64::new(0),
                rollbacks: AtomicU64::new(0),
                skipped_dead: AtomicU64::new(0),
                sweeps: AtomicU64::new(0),
                evictions: AtomicU64::new(0),
                refusals: AtomicU64::new(0),
                start_time: Instant::now(),
            }),
        }
    }

    /// An entry became tracked
    pub fn record_tracked(&self) {
        self.inner.tracked.fetch_add(1, Ordering::Relaxed);
    }

    /// A removal notification dropped a live binding
    pub fn record_untracked(&self) {
        self.inner.untracked.fetch_add(1, Ordering::Relaxed);
    }

    /// A tracking attempt lost a race and was undone
    pub fn record_rollback(&self) {
        self.inner.rollbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// An access was ignored because the entry had no value
    pub fn record_skipped_dead(&self) {
        self.inner.skipped_dead.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep(&self) {
        self.inner.sweeps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.inner.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// The host declined to evict a candidate
    pub fn record_refusal(&self) {
        self.inner.refusals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn evictions(&self) -> u64 {
        self.inner.evictions.load(Ordering::Relaxed)
    }

    pub fn rollbacks(&self) -> u64 {
        self.inner.rollbacks.load(Ordering::Relaxed)
    }

    pub fn refusals(&self) -> u64 {
        self.inner.refusals.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.inner.start_time.elapsed()
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.inner.tracked.store(0, Ordering::Relaxed);
        self.inner.untracked.store(0, Ordering::Relaxed);
        self.inner.rollbacks.store(0, Ordering::Relaxed);
        self.inner.skipped_dead.store(0, Ordering::Relaxed);
        self.inner.sweeps.store(0, Ordering::Relaxed);
        self.inner.evictions.store(0, Ordering::Relaxed);
        self.inner.refusals.store(0, Ordering::Relaxed);
    }
}

impl Default for EvictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_reset() {
        let metrics = EvictionMetrics::new();
        metrics.record_tracked();
        metrics.record_tracked();
        metrics.record_eviction();
        metrics.record_refusal();

        let snapshot = metrics.snapshot(1, 10);
        assert_eq!(snapshot.tracked, 2);
        assert_eq!(snapshot.evictions, 1);
        assert_eq!(snapshot.refusals, 1);
        assert_eq!(snapshot.current_size, 1);
        assert_eq!(snapshot.max_size, 10);

        metrics.reset();
        assert_eq!(metrics.evictions(), 0);
        assert_eq!(metrics.refusals(), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = EvictionMetrics::new();
        let other = metrics.clone();

        other.record_rollback();

        assert_eq!(metrics.rollbacks(), 1);
    }
}
