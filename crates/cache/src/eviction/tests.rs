//! Tests for the priority eviction policy

use super::*;
use crate::config::EvictionConfig;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Entry of a fake host cache. Successful evictions are appended to a log
/// shared by all entries of the same host.
#[derive(Clone)]
struct TestEntry {
    inner: Arc<TestEntryInner>,
}

struct TestEntryInner {
    id: u64,
    priority: i32,
    cached: AtomicBool,
    has_value: AtomicBool,
    pinned: AtomicBool,
    refuse_once: AtomicBool,
    log: Arc<Mutex<Vec<u64>>>,
}

impl TestEntry {
    fn pin(&self) {
        self.inner.pinned.store(true, Ordering::SeqCst);
    }

    fn unpin(&self) {
        self.inner.pinned.store(false, Ordering::SeqCst);
    }

    fn refuse_next_eviction(&self) {
        self.inner.refuse_once.store(true, Ordering::SeqCst);
    }

    fn drop_value(&self) {
        self.inner.has_value.store(false, Ordering::SeqCst);
    }

    fn leave_cache(&self) {
        self.inner.cached.store(false, Ordering::SeqCst);
    }

    fn rejoin_cache(&self) {
        self.inner.cached.store(true, Ordering::SeqCst);
    }
}

impl EvictableEntry for TestEntry {
    type Id = u64;
    type Value = i32;

    fn id(&self) -> u64 {
        self.inner.id
    }

    fn peek_value(&self) -> Option<i32> {
        self.inner
            .has_value
            .load(Ordering::SeqCst)
            .then_some(self.inner.priority)
    }

    fn is_cached(&self) -> bool {
        self.inner.cached.load(Ordering::SeqCst)
    }

    fn evict(&self) -> bool {
        if self.inner.pinned.load(Ordering::SeqCst)
            || self.inner.refuse_once.swap(false, Ordering::SeqCst)
        {
            return false;
        }
        if self.inner.cached.swap(false, Ordering::SeqCst) {
            self.inner.log.lock().push(self.inner.id);
            true
        } else {
            false
        }
    }
}

#[derive(Default)]
struct TestHost {
    next_id: u64,
    log: Arc<Mutex<Vec<u64>>>,
}

impl TestHost {
    fn entry(&mut self, priority: i32) -> TestEntry {
        let id = self.next_id;
        self.next_id += 1;
        TestEntry {
            inner: Arc::new(TestEntryInner {
                id,
                priority,
                cached: AtomicBool::new(true),
                has_value: AtomicBool::new(true),
                pinned: AtomicBool::new(false),
                refuse_once: AtomicBool::new(false),
                log: Arc::clone(&self.log),
            }),
        }
    }

    fn evicted(&self) -> Vec<u64> {
        self.log.lock().clone()
    }
}

type TestPolicy = PriorityEvictionPolicy<TestEntry, i32, fn(&i32) -> i32>;

fn policy(max_size: u64) -> TestPolicy {
    fn priority(v: &i32) -> i32 {
        *v
    }
    PriorityEvictionPolicy::new(
        &EvictionConfig::new(max_size).unwrap(),
        priority as fn(&i32) -> i32,
    )
}

fn tracked_ids(policy: &TestPolicy) -> Vec<u64> {
    policy
        .eviction_order()
        .into_iter()
        .map(|(_, e)| e.id())
        .collect()
}

#[test]
fn test_bound_is_enforced_on_insert() {
    let mut host = TestHost::default();
    let policy = policy(3);

    for prio in [5, 1, 9, 3, 7] {
        policy.on_entry_accessed(false, &host.entry(prio));
    }

    assert_eq!(policy.tracked(), 3);
    // ids 1 (prio 1) and 3 (prio 3) were the lowest when each sweep ran
    assert_eq!(host.evicted(), vec![1, 3]);
    assert_eq!(tracked_ids(&policy), vec![0, 4, 2]);
}

#[test]
fn test_forced_sweep_evicts_lowest_in_ascending_order() {
    let mut host = TestHost::default();
    let policy = policy(3);

    let priorities = [8, 2, 6, 4, 9, 1];
    let entries: Vec<_> = priorities.iter().map(|&p| host.entry(p)).collect();
    for entry in &entries {
        entry.pin();
        policy.on_entry_accessed(false, entry);
    }
    assert_eq!(policy.tracked(), 6);
    assert!(host.evicted().is_empty());

    for entry in &entries {
        entry.unpin();
    }
    policy.on_entry_accessed(false, &host.entry(10));

    // Four over the bound: prio 1, 2, 4, 6
    assert_eq!(host.evicted(), vec![5, 1, 3, 2]);
    assert_eq!(policy.tracked(), 3);
}

#[test]
fn test_equal_priority_evicts_in_tracking_order() {
    let mut host = TestHost::default();
    let policy = policy(2);

    for _ in 0..5 {
        policy.on_entry_accessed(false, &host.entry(4));
    }

    assert_eq!(host.evicted(), vec![0, 1, 2]);
    assert_eq!(tracked_ids(&policy), vec![3, 4]);
}

#[test]
fn test_duplicate_removal_is_noop() {
    let mut host = TestHost::default();
    let policy = policy(10);
    let a = host.entry(1);
    let b = host.entry(2);

    policy.on_entry_accessed(false, &a);
    policy.on_entry_accessed(false, &b);
    assert_eq!(policy.tracked(), 2);

    a.leave_cache();
    policy.on_entry_accessed(true, &a);
    policy.on_entry_accessed(true, &a);

    assert_eq!(policy.tracked(), 1);
    assert_eq!(policy.key_of(&a), None);
    assert_eq!(policy.snapshot().untracked, 1);
}

#[test]
fn test_removal_of_untracked_entry_is_noop() {
    let mut host = TestHost::default();
    let policy = policy(10);

    policy.on_entry_accessed(true, &host.entry(1));

    assert_eq!(policy.tracked(), 0);
}

#[test]
fn test_entry_without_value_is_not_tracked() {
    let mut host = TestHost::default();
    let policy = policy(10);
    let entry = host.entry(3);
    entry.drop_value();

    policy.on_entry_accessed(false, &entry);

    assert_eq!(policy.tracked(), 0);
    assert_eq!(policy.key_of(&entry), None);
    assert!(policy.eviction_order().is_empty());
    assert_eq!(policy.snapshot().skipped_dead, 1);
}

#[test]
fn test_repeat_access_keeps_original_key() {
    let mut host = TestHost::default();
    let policy = policy(10);
    let entry = host.entry(3);

    policy.on_entry_accessed(false, &entry);
    let first = policy.key_of(&entry).unwrap();
    policy.on_entry_accessed(false, &entry);

    assert_eq!(policy.tracked(), 1);
    assert_eq!(policy.key_of(&entry), Some(first));
    assert_eq!(policy.metrics().rollbacks(), 1);
}

#[test]
fn test_entry_leaving_cache_is_rolled_back() {
    let mut host = TestHost::default();
    let policy = policy(10);
    let entry = host.entry(3);

    // Value still readable, but the cache no longer holds the entry
    entry.leave_cache();
    policy.on_entry_accessed(false, &entry);

    assert_eq!(policy.tracked(), 0);
    assert_eq!(policy.key_of(&entry), None);
    assert_eq!(policy.metrics().rollbacks(), 1);
}

#[test]
fn test_removed_entry_can_be_tracked_again() {
    let mut host = TestHost::default();
    let policy = policy(10);
    let entry = host.entry(3);

    policy.on_entry_accessed(false, &entry);
    entry.leave_cache();
    policy.on_entry_accessed(true, &entry);
    entry.rejoin_cache();
    policy.on_entry_accessed(false, &entry);

    assert_eq!(policy.tracked(), 1);
    assert!(policy.key_of(&entry).is_some());
}

#[test]
fn test_refused_candidates_are_skipped() {
    let mut host = TestHost::default();
    let policy = policy(2);

    let locked = host.entry(1);
    locked.pin();
    policy.on_entry_accessed(false, &locked);
    policy.on_entry_accessed(false, &host.entry(5));
    policy.on_entry_accessed(false, &host.entry(7));

    // prio 1 refuses, so prio 5 goes instead
    assert_eq!(host.evicted(), vec![1]);
    assert_eq!(tracked_ids(&policy), vec![0, 2]);
    assert_eq!(policy.metrics().refusals(), 1);
}

#[test]
fn test_sweep_stops_when_every_candidate_refuses() {
    let mut host = TestHost::default();
    let policy = policy(1);

    for prio in [3, 2, 1] {
        let entry = host.entry(prio);
        entry.pin();
        policy.on_entry_accessed(false, &entry);
    }

    assert_eq!(policy.tracked(), 3);
    assert!(host.evicted().is_empty());
    assert_eq!(policy.metrics().evictions(), 0);
}

#[test]
fn test_evicted_entry_slot_is_cleared() {
    let mut host = TestHost::default();
    let policy = policy(1);
    let low = host.entry(1);

    policy.on_entry_accessed(false, &low);
    policy.on_entry_accessed(false, &host.entry(2));

    assert_eq!(host.evicted(), vec![0]);
    assert_eq!(policy.key_of(&low), None);

    // The host confirming the removal afterwards changes nothing
    policy.on_entry_accessed(true, &low);
    assert_eq!(policy.tracked(), 1);
}

#[test]
fn test_eviction_through_pending_binding_untracks_live_key() {
    let mut host = TestHost::default();
    let policy = policy(1);
    let a = host.entry(1);
    a.refuse_next_eviction();
    policy.on_entry_accessed(false, &a);
    let live = policy.key_of(&a).unwrap();

    // A concurrent access of `a` has bound a second key and not rolled back yet
    let pending = PolicyKey::new(9, u64::MAX);
    assert!(policy.index().insert_if_absent(pending.clone(), a.clone()));

    // `a` refuses under its live key, then goes through the pending one
    policy.on_entry_accessed(false, &host.entry(5));

    assert_eq!(host.evicted(), vec![1, 0]);
    assert_eq!(policy.tracked(), 0);
    assert_eq!(policy.key_of(&a), None);
    assert!(!policy.index().remove_if_matches(&live, &a));
    assert!(!policy.index().remove_if_matches(&pending, &a));

    // Full capacity is still available afterwards
    for prio in [50, 60] {
        policy.on_entry_accessed(false, &host.entry(prio));
    }
    assert_eq!(policy.tracked(), 1);
    assert_eq!(tracked_ids(&policy), vec![3]);
}

#[test]
fn test_fifo_policy_ignores_values() {
    let mut host = TestHost::default();
    let policy = FifoEvictionPolicy::<TestEntry>::fifo(&EvictionConfig::new(2).unwrap());

    for prio in [9, 1, 5, 3] {
        policy.on_entry_accessed(false, &host.entry(prio));
    }

    assert_eq!(host.evicted(), vec![0, 1]);
}

#[test]
fn test_factory() {
    let config = EvictionConfig::new(1).unwrap();
    let mut host = TestHost::default();

    let policy: Box<dyn EvictionPolicy<TestEntry>> =
        create_eviction_policy(PolicyKind::Priority, &config, |v: &i32| *v).unwrap();
    policy.on_entry_accessed(false, &host.entry(5));
    policy.on_entry_accessed(false, &host.entry(1));
    assert_eq!(host.evicted(), vec![1]);
    assert_eq!(policy.max_size(), 1);

    assert_eq!("FIFO".parse::<PolicyKind>().unwrap(), PolicyKind::Fifo);
    assert!("lru".parse::<PolicyKind>().is_err());
}

#[test]
fn test_clear_forgets_everything() {
    let mut host = TestHost::default();
    let policy = policy(10);
    let entry = host.entry(1);
    policy.on_entry_accessed(false, &entry);
    policy.on_entry_accessed(false, &host.entry(2));

    policy.clear();

    assert_eq!(policy.tracked(), 0);
    assert_eq!(policy.key_of(&entry), None);
    policy.on_entry_accessed(false, &entry);
    assert_eq!(policy.tracked(), 1);
}
