//! Engine-owned per-entry metadata: the key an entry is currently tracked under

use crate::eviction::key::PolicyKey;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::hash::Hash;

/// Side table from entry identity to its live [`PolicyKey`].
///
/// An entry has at most one slot. Installing is put-if-absent, which is
/// what serializes two threads racing to track the same entry.
#[derive(Debug)]
pub struct EntrySlots<Id, P>
where
    Id: Eq + Hash,
{
    slots: DashMap<Id, PolicyKey<P>>,
}

impl<Id, P> EntrySlots<Id, P>
where
    Id: Eq + Hash,
    P: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    pub fn get(&self, id: &Id) -> Option<PolicyKey<P>> {
        self.slots.get(id).map(|slot| slot.value().clone())
    }

    /// Install `key` for `id` if no key is installed.
    ///
    /// Returns the key already present when the install lost.
    pub fn put_if_absent(&self, id: Id, key: PolicyKey<P>) -> Option<PolicyKey<P>> {
        match self.slots.entry(id) {
            Entry::Occupied(existing) => Some(existing.get().clone()),
            Entry::Vacant(vacant) => {
                vacant.insert(key);
                None
            }
        }
    }

    /// Clear the slot for `id` only if it still holds `key`
    pub fn remove_if(&self, id: &Id, key: &PolicyKey<P>) -> bool {
        self.slots.remove_if(id, |_, current| current == key).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&self) {
        self.slots.clear();
    }
}

impl<Id, P> Default for EntrySlots<Id, P>
where
    Id: Eq + Hash,
    P: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}
