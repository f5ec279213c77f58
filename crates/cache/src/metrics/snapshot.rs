//! Point-in-time view of the eviction metrics

use super::EvictionMetrics;
use serde::Serialize;
use std::sync::atomic::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub tracked: u64,
    pub untracked: u64,
    pub rollbacks: u64,
    pub skipped_dead: u64,
    pub sweeps: u64,
    pub evictions: u64,
    pub refusals: u64,
    /// Tracked entries right now, from the index counter
    pub current_size: u64,
    pub max_size: u64,
    pub uptime_ms: u64,
}

impl EvictionMetrics {
    /// Take a snapshot, combining the counters with the caller's view of
    /// the index size and bound
    pub fn snapshot(&self, current_size: u64, max_size: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            tracked: self.inner.tracked.load(Ordering::Relaxed),
            untracked: self.inner.untracked.load(Ordering::Relaxed),
            rollbacks: self.inner.rollbacks.load(Ordering::Relaxed),
            skipped_dead: self.inner.skipped_dead.load(Ordering::Relaxed),
            sweeps: self.inner.sweeps.load(Ordering::Relaxed),
            evictions: self.inner.evictions.load(Ordering::Relaxed),
            refusals: self.inner.refusals.load(Ordering::Relaxed),
            current_size,
            max_size,
            uptime_ms: self.uptime().as_millis() as u64,
        }
    }
}
