//! Recency partition (T1) of the adaptive cache, with its ghost list (B1).

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::ghost_list::GhostList;
use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;

#[derive(Debug)]
struct Resident<K, V> {
    key: K,
    value: V,
    access_count: u64,
}

/// LRU-ordered resident partition with adaptive capacity.
///
/// The partition's capacity moves ±1 under ghost steering; the ghost list's
/// own capacity stays fixed at the engine's construction-time capacity.
/// Hits report whether the entry has crossed the promotion threshold so the
/// engine can mirror it into the frequency partition.
#[derive(Debug)]
pub(crate) struct ArcRecencyPart<K, V> {
    index: FxHashMap<K, SlotId>,
    list: RecencyList<Resident<K, V>>,
    ghost: GhostList<K>,
    capacity: usize,
    threshold: u64,
}

impl<K, V> ArcRecencyPart<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(capacity: usize, threshold: u64) -> Self {
        Self {
            index: FxHashMap::default(),
            list: RecencyList::with_capacity(capacity),
            ghost: GhostList::new(capacity),
            capacity,
            threshold,
        }
    }

    /// Installs `key` at the MRU end, evicting the LRU resident to the ghost
    /// list when full. Overwrites in place (and refreshes recency) when the
    /// key is already resident, returning the displaced value.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }
        if let Some(&id) = self.index.get(&key) {
            let entry = self.list.get_mut(id)?;
            let previous = std::mem::replace(&mut entry.value, value);
            self.list.move_to_back(id);
            return Some(previous);
        }

        if self.list.len() >= self.capacity {
            self.evict_to_ghost();
        }
        let id = self.list.push_back(Resident {
            key: key.clone(),
            value,
            access_count: 0,
        });
        self.index.insert(key, id);
        None
    }

    /// Hit path: refresh recency, bump the access counter, and report
    /// whether the entry is ready for promotion into the frequency
    /// partition.
    pub(crate) fn get(&mut self, key: &K) -> Option<(&V, bool)> {
        let id = *self.index.get(key)?;
        self.list.move_to_back(id);
        let promote = {
            let entry = self.list.get_mut(id)?;
            entry.access_count += 1;
            entry.access_count >= self.threshold
        };
        self.list.get(id).map(|entry| (&entry.value, promote))
    }

    /// Ghost-hit probe: removes `key` from B1 and reports whether it was
    /// there.
    pub(crate) fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    pub(crate) fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Shrinks the partition by one, first demoting the LRU resident to the
    /// ghost list if the partition is currently full. No-op at capacity 0.
    pub(crate) fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.list.len() >= self.capacity {
            self.evict_to_ghost();
        }
        self.capacity -= 1;
        true
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    #[cfg(test)]
    pub(crate) fn ghost_contains(&self, key: &K) -> bool {
        self.ghost.contains(key)
    }

    /// Drops residents and ghosts and restores the given capacity.
    pub(crate) fn reset(&mut self, capacity: usize) {
        self.index.clear();
        self.list.clear();
        self.ghost.clear();
        self.capacity = capacity;
    }

    fn evict_to_ghost(&mut self) {
        if let Some(victim) = self.list.pop_front() {
            self.index.remove(&victim.key);
            self.ghost.record(victim.key);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.list.len(), "index/list size skew");
        assert!(self.list.len() <= self.capacity, "partition over capacity");
        for entry in self.list.iter() {
            assert!(
                !self.ghost.contains(&entry.key),
                "key resident and ghosted at once"
            );
        }
        self.list.debug_validate_invariants();
        self.ghost.debug_validate_invariants();
    }
}
