//! Frequency-bucketed key ordering with a tracked minimum.
//!
//! Keys are grouped by access frequency. Buckets live in a `BTreeMap` keyed
//! by frequency, so "the smallest present frequency" is always the first map
//! key; within a bucket, keys are chained oldest-first over a [`SlotArena`].
//! New arrivals append at the bucket tail, so the bucket front is the oldest
//! key at that frequency and therefore the eviction victim.
//!
//! [`FreqBuckets::age_all`] applies the uniform decay used by LFU aging:
//! every frequency drops by a fixed amount (never below 1), buckets are
//! rebuilt, and the minimum cursor is re-derived.

use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct FreqEntry<K> {
    key: K,
    freq: u64,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

/// Frequency → bucket-list mapping with O(1) touch and min-frequency eviction.
#[derive(Debug)]
pub struct FreqBuckets<K> {
    entries: SlotArena<FreqEntry<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: BTreeMap<u64, Bucket>,
    min_freq: u64,
}

impl<K> FreqBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: BTreeMap::new(),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current frequency of `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Smallest frequency present, or `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 { None } else { Some(self.min_freq) }
    }

    /// Tracks `key` at frequency 1. Returns `false` if already tracked.
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let id = self.entries.insert(FreqEntry {
            key: key.clone(),
            freq: 1,
            prev: None,
            next: None,
        });
        self.index.insert(key, id);
        self.bucket_push_back(1, id);
        self.min_freq = 1;
        true
    }

    /// Bumps the frequency of `key` by one, returning the new frequency.
    ///
    /// The key moves to the tail of its new bucket; when the old bucket was
    /// the minimum and drains, the minimum advances to the bucket just
    /// created (which always exists, since the bumped key lands there).
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let freq = self.entries.get(id)?.freq;
        let next_freq = freq.saturating_add(1);
        if next_freq == freq {
            // Saturated counter: refresh the within-bucket position only.
            self.bucket_remove(freq, id);
            self.bucket_push_back(freq, id);
            return Some(freq);
        }

        let emptied = self.bucket_remove(freq, id);
        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = next_freq;
        }
        self.bucket_push_back(next_freq, id);
        if emptied && self.min_freq == freq {
            self.min_freq = next_freq;
        }
        Some(next_freq)
    }

    /// Stops tracking `key`, returning its last frequency.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let id = self.index.remove(key)?;
        let freq = self.entries.get(id)?.freq;
        let emptied = self.bucket_remove(freq, id);
        if emptied && self.min_freq == freq {
            self.min_freq = self.smallest_bucket();
        }
        self.entries.remove(id);
        Some(freq)
    }

    /// Evicts the oldest key at the minimum frequency.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.head?;
        let freq = self.min_freq;
        let emptied = self.bucket_remove(freq, id);
        if emptied {
            self.min_freq = self.smallest_bucket();
        }
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.freq))
    }

    /// The key `pop_min` would evict, without removing it.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.head?;
        let entry = self.entries.get(id)?;
        Some((&entry.key, entry.freq))
    }

    /// Subtracts `decay` from every frequency (flooring at 1), rebuilds the
    /// buckets, and re-derives the minimum cursor.
    ///
    /// Returns the new total frequency across all keys, so callers can keep
    /// their running average honest after the decay.
    pub fn age_all(&mut self, decay: u64) -> u64 {
        let ids: Vec<SlotId> = self.entries.iter().map(|(id, _)| id).collect();
        self.buckets.clear();

        let mut total = 0u64;
        for id in ids {
            let freq = {
                let entry = match self.entries.get_mut(id) {
                    Some(entry) => entry,
                    None => continue,
                };
                entry.freq = entry.freq.saturating_sub(decay).max(1);
                entry.prev = None;
                entry.next = None;
                entry.freq
            };
            total += freq;
            self.bucket_push_back(freq, id);
        }
        self.min_freq = self.smallest_bucket();
        total
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    fn smallest_bucket(&self) -> u64 {
        self.buckets.keys().next().copied().unwrap_or(0)
    }

    fn bucket_push_back(&mut self, freq: u64, id: SlotId) {
        let bucket = self.buckets.entry(freq).or_default();
        let old_tail = bucket.tail;
        bucket.tail = Some(id);
        if bucket.head.is_none() {
            bucket.head = Some(id);
        }
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = old_tail;
            entry.next = None;
        }
        if let Some(t) = old_tail {
            if let Some(entry) = self.entries.get_mut(t) {
                entry.next = Some(id);
            }
        }
    }

    /// Unlinks `id` from its bucket; drops the bucket if it drains.
    /// Returns `true` when the bucket was removed.
    fn bucket_remove(&mut self, freq: u64, id: SlotId) -> bool {
        let (prev, next) = match self.entries.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return false,
        };
        match prev {
            Some(p) => {
                if let Some(entry) = self.entries.get_mut(p) {
                    entry.next = next;
                }
            },
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.head = next;
                }
            },
        }
        match next {
            Some(n) => {
                if let Some(entry) = self.entries.get_mut(n) {
                    entry.prev = prev;
                }
            },
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.tail = prev;
                }
            },
        }
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }

        let drained = self
            .buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(false);
        if drained {
            self.buckets.remove(&freq);
        }
        drained
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.entries.len(), self.index.len());
        if self.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }
        assert_eq!(
            Some(self.min_freq),
            self.buckets.keys().next().copied(),
            "min_freq must be the smallest bucket key"
        );

        let mut seen = 0usize;
        for (&freq, bucket) in &self.buckets {
            let mut cursor = bucket.head;
            let mut last = None;
            assert!(cursor.is_some(), "empty bucket left in map");
            while let Some(id) = cursor {
                let entry = self.entries.get(id).expect("bucket chain names dead slot");
                assert_eq!(entry.freq, freq, "entry filed under wrong frequency");
                assert_eq!(entry.prev, last);
                assert_eq!(self.index.get(&entry.key), Some(&id));
                last = Some(id);
                cursor = entry.next;
                seen += 1;
            }
            assert_eq!(bucket.tail, last);
        }
        assert_eq!(seen, self.entries.len(), "entries unreachable from buckets");
    }
}

impl<K> Default for FreqBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_starts_at_frequency_one() {
        let mut buckets = FreqBuckets::new();
        assert!(buckets.insert("a"));
        assert!(!buckets.insert("a"));
        assert_eq!(buckets.frequency(&"a"), Some(1));
        assert_eq!(buckets.min_freq(), Some(1));
        buckets.debug_validate_invariants();
    }

    #[test]
    fn touch_bumps_and_advances_min() {
        let mut buckets = FreqBuckets::new();
        buckets.insert("a");
        buckets.insert("b");

        assert_eq!(buckets.touch(&"a"), Some(2));
        assert_eq!(buckets.min_freq(), Some(1));

        // Draining the minimum bucket advances the cursor.
        assert_eq!(buckets.touch(&"b"), Some(2));
        assert_eq!(buckets.min_freq(), Some(2));
        buckets.debug_validate_invariants();
    }

    #[test]
    fn pop_min_takes_oldest_at_min_frequency() {
        let mut buckets = FreqBuckets::new();
        buckets.insert("a");
        buckets.insert("b");
        buckets.insert("c");
        buckets.touch(&"a");

        // b and c share freq 1; b arrived first.
        assert_eq!(buckets.pop_min(), Some(("b", 1)));
        assert_eq!(buckets.pop_min(), Some(("c", 1)));
        assert_eq!(buckets.min_freq(), Some(2));
        assert_eq!(buckets.pop_min(), Some(("a", 2)));
        assert_eq!(buckets.pop_min(), None);
        buckets.debug_validate_invariants();
    }

    #[test]
    fn bump_moves_to_new_bucket_tail() {
        let mut buckets = FreqBuckets::new();
        buckets.insert("a");
        buckets.insert("b");
        buckets.touch(&"a");
        buckets.touch(&"b");

        // Both at freq 2 now; "a" reached it first, so "a" is the victim.
        assert_eq!(buckets.peek_min(), Some((&"a", 2)));
        buckets.debug_validate_invariants();
    }

    #[test]
    fn remove_updates_min_cursor() {
        let mut buckets = FreqBuckets::new();
        buckets.insert("a");
        buckets.insert("b");
        buckets.touch(&"b");
        buckets.touch(&"b");

        assert_eq!(buckets.remove(&"a"), Some(1));
        assert_eq!(buckets.min_freq(), Some(3));
        assert_eq!(buckets.remove(&"missing"), None);
        buckets.debug_validate_invariants();
    }

    #[test]
    fn touch_missing_is_none() {
        let mut buckets: FreqBuckets<&str> = FreqBuckets::new();
        assert_eq!(buckets.touch(&"nope"), None);
        assert!(buckets.is_empty());
    }

    #[test]
    fn age_all_floors_at_one_and_recounts() {
        let mut buckets = FreqBuckets::new();
        buckets.insert("hot");
        buckets.insert("cold");
        for _ in 0..7 {
            buckets.touch(&"hot");
        }
        assert_eq!(buckets.frequency(&"hot"), Some(8));
        assert_eq!(buckets.frequency(&"cold"), Some(1));

        let total = buckets.age_all(5);
        assert_eq!(buckets.frequency(&"hot"), Some(3));
        assert_eq!(buckets.frequency(&"cold"), Some(1));
        assert_eq!(total, 4);
        assert_eq!(buckets.min_freq(), Some(1));
        buckets.debug_validate_invariants();
    }

    #[test]
    fn age_all_merges_buckets() {
        let mut buckets = FreqBuckets::new();
        buckets.insert("a");
        buckets.insert("b");
        buckets.touch(&"b"); // a@1, b@2

        buckets.age_all(1); // both at 1
        assert_eq!(buckets.frequency(&"a"), Some(1));
        assert_eq!(buckets.frequency(&"b"), Some(1));
        assert_eq!(buckets.min_freq(), Some(1));
        buckets.debug_validate_invariants();
    }

    #[test]
    fn clear_resets_cursor() {
        let mut buckets = FreqBuckets::new();
        buckets.insert("a");
        buckets.touch(&"a");
        buckets.clear();
        assert!(buckets.is_empty());
        assert_eq!(buckets.min_freq(), None);
        assert_eq!(buckets.pop_min(), None);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// min_freq always names the smallest live frequency, and pop_min
        /// always returns a key at that frequency.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_min_cursor_is_exact(ops in prop::collection::vec(any::<(u8, u8)>(), 0..200)) {
            let mut buckets = FreqBuckets::new();

            for (action, key) in ops {
                let key = key % 16;
                match action % 4 {
                    0 => { buckets.insert(key); },
                    1 => { buckets.touch(&key); },
                    2 => { buckets.remove(&key); },
                    _ => {
                        if let Some((_, freq)) = buckets.pop_min() {
                            prop_assert!(buckets
                                .min_freq()
                                .map(|min| min >= freq)
                                .unwrap_or(true));
                        }
                    },
                }

                if let Some(min) = buckets.min_freq() {
                    let mut smallest = u64::MAX;
                    for k in 0u8..16 {
                        if let Some(f) = buckets.frequency(&k) {
                            smallest = smallest.min(f);
                        }
                    }
                    prop_assert_eq!(min, smallest);
                }
            }
            buckets.debug_validate_invariants();
        }
    }
}
