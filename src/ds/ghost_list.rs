//! Bounded FIFO of evicted keys ("ghost" entries).
//!
//! A ghost entry is a key-only remnant of an evicted resident. Adaptive
//! policies probe the ghost lists on every access: a hit means "we evicted
//! this too early" and steers capacity toward the partition that lost it.
//!
//! Ordering is strict FIFO — evictions are pushed at the tail and overflow
//! drops from the head. Unlike a recency list, a re-recorded key is *not*
//! promoted; a key can only legally enter the ghost list once, because it
//! cannot be resident and ghost at the same time.
//!
//! ```text
//!   head ──► [oldest ghost] ◄──► ... ◄──► [newest ghost] ◄── tail
//!            dropped on overflow          pushed on eviction
//! ```
//!
//! Membership checks go through a key index and are O(1).

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;

/// Bounded FIFO of keys with O(1) membership and removal.
#[derive(Debug)]
pub struct GhostList<K> {
    queue: RecencyList<K>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list holding at most `capacity` keys.
    ///
    /// Capacity 0 produces a list that ignores every `record`.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: RecencyList::with_capacity(capacity),
            index: FxHashMap::default(),
            capacity,
        }
    }

    /// Maximum number of keys tracked.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// `true` when no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The ghost-hit check: is `key` one of the recently evicted?
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records an evicted `key` at the tail, dropping the oldest ghost first
    /// if the list is full.
    ///
    /// A key that is somehow already tracked is left in place (FIFO order is
    /// never revised).
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 || self.index.contains_key(&key) {
            return;
        }
        if self.queue.len() >= self.capacity {
            if let Some(old) = self.queue.pop_front() {
                self.index.remove(&old);
            }
        }
        let id = self.queue.push_back(key.clone());
        self.index.insert(key, id);
    }

    /// Removes `key`, returning `true` if it was tracked.
    ///
    /// Called on a ghost hit so the same eviction is never counted twice.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.queue.remove(id);
                true
            },
            None => false,
        }
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.queue.len(), self.index.len(), "queue/index size skew");
        assert!(self.queue.len() <= self.capacity, "ghost list over capacity");
        for key in self.queue.iter() {
            assert!(self.index.contains_key(key), "queued key missing from index");
        }
        self.queue.debug_validate_invariants();
    }
}
