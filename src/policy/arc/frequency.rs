//! Frequency partition (T2) of the adaptive cache, with its ghost list (B2).

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::freq_buckets::FreqBuckets;
use crate::ds::ghost_list::GhostList;

/// Frequency-bucketed resident partition with adaptive capacity.
///
/// Same shape as the LFU engine's resident set — frequency buckets with a
/// min-frequency cursor, oldest-at-minimum eviction — but evictions fall
/// into a ghost list and the capacity moves ±1 under ghost steering. There
/// is no aging here: the partition tracks raw frequencies for as long as a
/// key stays resident.
#[derive(Debug)]
pub(crate) struct ArcFrequencyPart<K, V> {
    values: FxHashMap<K, V>,
    order: FreqBuckets<K>,
    ghost: GhostList<K>,
    capacity: usize,
}

impl<K, V> ArcFrequencyPart<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            values: FxHashMap::default(),
            order: FreqBuckets::new(),
            ghost: GhostList::new(capacity),
            capacity,
        }
    }

    /// Admits `key` at frequency 1, evicting the oldest minimum-frequency
    /// resident to the ghost list when full. An already-resident key gets
    /// its value overwritten and its frequency bumped.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.values.get_mut(&key) {
            *slot = value;
            self.order.touch(&key);
            return;
        }

        if self.values.len() >= self.capacity {
            self.evict_to_ghost();
        }
        self.order.insert(key.clone());
        self.values.insert(key, value);
    }

    /// Hit path: bump frequency, return the value.
    pub(crate) fn get(&mut self, key: &K) -> Option<&V> {
        if !self.values.contains_key(key) {
            return None;
        }
        self.order.touch(key);
        self.values.get(key)
    }

    /// Ghost-hit probe: removes `key` from B2 and reports whether it was
    /// there.
    pub(crate) fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    pub(crate) fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Shrinks the partition by one, first demoting the current victim to
    /// the ghost list if the partition is full. No-op at capacity 0.
    pub(crate) fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.values.len() >= self.capacity {
            self.evict_to_ghost();
        }
        self.capacity -= 1;
        true
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    pub(crate) fn frequency(&self, key: &K) -> Option<u64> {
        self.order.frequency(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
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
        self.values.clear();
        self.order.clear();
        self.ghost.clear();
        self.capacity = capacity;
    }

    fn evict_to_ghost(&mut self) {
        if let Some((victim, _)) = self.order.pop_min() {
            self.values.remove(&victim);
            self.ghost.record(victim);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate_invariants(&self) {
        assert_eq!(self.values.len(), self.order.len(), "values/order size skew");
        assert!(self.values.len() <= self.capacity, "partition over capacity");
        for key in self.values.keys() {
            assert!(!self.ghost.contains(key), "key resident and ghosted at once");
        }
        self.order.debug_validate_invariants();
        self.ghost.debug_validate_invariants();
    }
}
