//! # LRU-K cache engine
//!
//! An LRU cache with an admission gate. Two recency structures cooperate:
//!
//! ```text
//!   ┌───────────────────────────┐      count reaches K      ┌──────────────────────────┐
//!   │  history: LruEngine<K,u64>│ ────────────────────────► │  main: LruEngine<K, V>   │
//!   │  (admission counts, LRU)  │   remove from history,    │  (values, plain LRU)     │
//!   └───────────────────────────┘   install into main       └──────────────────────────┘
//! ```
//!
//! The history half maps keys to how often they have been seen; it holds no
//! values and is itself LRU-bounded, so counts for cold keys age out. Only a
//! key seen at least K times is admitted to the main cache — one-shot keys
//! (scans) never displace the resident set.
//!
//! A key still in history is invisible to `get`: the engine reports a miss
//! until promotion. With K = 1 the gate is open and this degenerates to a
//! plain LRU.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ConfigError;
use crate::policy::lru::LruEngine;
use crate::traits::{EngineCore, MutableEngine, SharedCache};

/// LRU cache gated by a K-admissions history.
pub struct LruKEngine<K, V> {
    history: LruEngine<K, u64>,
    main: LruEngine<K, V>,
    k: u64,
}

impl<K, V> LruKEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with the given main capacity, history capacity, and
    /// promotion threshold `k`.
    ///
    /// `k` is clamped to at least 1; use [`try_new`](Self::try_new) to reject
    /// a zero threshold instead.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru_k::LruKEngine;
    /// use evictkit::traits::EngineCore;
    ///
    /// let mut cache = LruKEngine::new(100, 200, 2);
    /// cache.insert(1, "seen once"); // history only
    /// assert_eq!(cache.get(&1), None);
    /// ```
    pub fn new(capacity: usize, history_capacity: usize, k: u64) -> Self {
        Self {
            history: LruEngine::new(history_capacity),
            main: LruEngine::new(capacity),
            k: k.max(1),
        }
    }

    /// Fallible constructor: rejects `k == 0`.
    pub fn try_new(capacity: usize, history_capacity: usize, k: u64) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::new("lru-k threshold k must be at least 1"));
        }
        Ok(Self::new(capacity, history_capacity, k))
    }

    /// The promotion threshold K.
    pub fn k_value(&self) -> u64 {
        self.k
    }

    /// Number of keys waiting in the admission history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Admission count recorded for `key`, if it is still in history.
    pub fn history_count(&self, key: &K) -> Option<u64> {
        self.history.peek(key).copied()
    }

    /// Records one sighting of `key` in the history, returning the new count.
    fn record_sighting(&mut self, key: &K) -> u64 {
        let count = self.history.get(key).copied().unwrap_or(0) + 1;
        self.history.insert(key.clone(), count);
        count
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.history.debug_validate_invariants();
        self.main.debug_validate_invariants();
    }
}

impl<K, V> EngineCore<K, V> for LruKEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Overwrites in place when `key` is already resident; otherwise counts
    /// the sighting and promotes once the count reaches K.
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.main.contains(&key) {
            return self.main.insert(key, value);
        }

        let count = self.record_sighting(&key);
        if count >= self.k {
            self.history.remove(&key);
            self.main.insert(key, value);
        }
        None
    }

    /// Counts the sighting (admitting `key` to history if absent), then
    /// serves from the main cache. Keys not yet promoted always miss.
    fn get(&mut self, key: &K) -> Option<&V> {
        self.record_sighting(key);
        self.main.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    fn len(&self) -> usize {
        self.main.len()
    }

    fn capacity(&self) -> usize {
        self.main.capacity()
    }

    fn clear(&mut self) {
        self.history.clear();
        self.main.clear();
    }
}

impl<K, V> MutableEngine<K, V> for LruKEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Removes `key` from the main cache and drops any pending history.
    fn remove(&mut self, key: &K) -> Option<V> {
        self.history.remove(key);
        self.main.remove(key)
    }
}

impl<K, V> fmt::Debug for LruKEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKEngine")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("history_len", &self.history.len())
            .field("k", &self.k)
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU-K cache: one mutex over history and main together.
pub struct SharedLruK<K, V> {
    inner: Arc<Mutex<LruKEngine<K, V>>>,
}

impl<K, V> Clone for SharedLruK<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruK<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a thread-safe LRU-K cache.
    pub fn new(capacity: usize, history_capacity: usize, k: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LruKEngine::new(capacity, history_capacity, k))),
        }
    }

    /// Inserts or counts a sighting of `key` (see [`LruKEngine::insert`]).
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    /// Looks up `key` in the main cache, counting the sighting.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Removes `key` from main and history.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Whether `key` has been promoted into the main cache.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Number of promoted entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` when no entry has been promoted.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Main-cache capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops all residents and pending history.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V> SharedCache<K, V> for SharedLruK<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        SharedLruK::put(self, key, value);
    }

    fn get_into(&self, key: &K, out: &mut V) -> bool {
        match self.inner.lock().get(key) {
            Some(value) => {
                out.clone_from(value);
                true
            },
            None => false,
        }
    }

    fn contains(&self, key: &K) -> bool {
        SharedLruK::contains(self, key)
    }

    fn len(&self) -> usize {
        SharedLruK::len(self)
    }

    fn capacity(&self) -> usize {
        SharedLruK::capacity(self)
    }

    fn clear(&self) {
        SharedLruK::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_stays_invisible() {
        let mut cache = LruKEngine::new(4, 8, 3);
        cache.insert(1, "a");
        cache.insert(1, "a");

        assert!(!cache.contains(&1));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.history_count(&1), Some(2));
        cache.debug_validate_invariants();
    }

    #[test]
    fn kth_put_promotes() {
        let mut cache = LruKEngine::new(4, 8, 2);
        cache.insert(1, "first");
        assert_eq!(cache.get(&1), None);

        cache.insert(1, "second");
        assert_eq!(cache.get(&1), Some(&"second"));
        assert_eq!(cache.history_count(&1), None); // moved out of history
        cache.debug_validate_invariants();
    }

    #[test]
    fn gets_count_toward_promotion() {
        let mut cache = LruKEngine::new(4, 8, 3);
        // Two misses build history; the next put crosses the threshold.
        cache.get(&7);
        cache.get(&7);
        cache.insert(7, "promoted");

        assert_eq!(cache.get(&7), Some(&"promoted"));
    }

    #[test]
    fn k_one_admits_immediately() {
        let mut cache = LruKEngine::new(4, 8, 1);
        cache.insert(1, "a");
        assert_eq!(cache.get(&1), Some(&"a"));
    }

    #[test]
    fn k_zero_is_clamped_and_try_new_rejects() {
        let cache: LruKEngine<u32, u32> = LruKEngine::new(4, 8, 0);
        assert_eq!(cache.k_value(), 1);
        assert!(LruKEngine::<u32, u32>::try_new(4, 8, 0).is_err());
        assert!(LruKEngine::<u32, u32>::try_new(4, 8, 2).is_ok());
    }

    #[test]
    fn overwrite_of_resident_skips_history() {
        let mut cache = LruKEngine::new(4, 8, 2);
        cache.insert(1, "a");
        cache.insert(1, "a"); // promoted
        assert_eq!(cache.insert(1, "b"), Some("a"));
        assert_eq!(cache.history_count(&1), None);
        assert_eq!(cache.get(&1), Some(&"b"));
    }

    #[test]
    fn history_is_lru_bounded() {
        let mut cache = LruKEngine::new(4, 2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c"); // history holds 2 keys; 1's count ages out

        assert_eq!(cache.history_count(&1), None);
        // Key 1 must start over: one more sighting is not enough.
        cache.insert(1, "a");
        assert!(!cache.contains(&1));
        cache.insert(1, "a");
        assert!(cache.contains(&1));
    }

    #[test]
    fn promotion_evicts_main_by_lru() {
        let mut cache = LruKEngine::new(2, 8, 2);
        for key in [1, 2, 3] {
            cache.insert(key, key);
            cache.insert(key, key);
        }
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&1)); // oldest promotion evicted
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn remove_also_clears_history() {
        let mut cache = LruKEngine::new(4, 8, 2);
        cache.insert(1, "a");
        assert_eq!(cache.remove(&1), None);
        assert_eq!(cache.history_count(&1), None);

        cache.insert(2, "b");
        cache.insert(2, "b");
        assert_eq!(cache.remove(&2), Some("b"));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn shared_wrapper_roundtrip() {
        let cache = SharedLruK::new(4, 8, 2);
        cache.put(1, 10);
        assert_eq!(cache.get(&1), None);
        cache.put(1, 10);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.len(), 1);
    }
}
