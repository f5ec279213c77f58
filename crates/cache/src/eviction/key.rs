//! Ordering key for tracked entries

use std::sync::atomic::{AtomicU64, Ordering};

/// Position of an entry in the tracking index.
///
/// Keys order by `priority` first and by `sequence` second, so two entries
/// with the same priority still get distinct keys and the one tracked
/// earlier sorts first. Field order matters: the derived `Ord` is
/// lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolicyKey<P> {
    priority: P,
    sequence: u64,
}

impl<P> PolicyKey<P> {
    pub fn new(priority: P, sequence: u64) -> Self {
        Self { priority, sequence }
    }

    pub fn priority(&self) -> &P {
        &self.priority
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Per-engine source of tie-break sequence numbers
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    last: AtomicU64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence number. Starts at 1 and never repeats.
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Last value handed out, 0 if none
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}
