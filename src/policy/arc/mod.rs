//! # Adaptive Replacement Cache (ARC) engine
//!
//! Two resident partitions under one roof, each with its own ghost list and
//! its own adaptive capacity:
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          ArcEngine<K, V>                             │
//!   │                                                                      │
//!   │   T1: recency partition              T2: frequency partition         │
//!   │   ┌─────────────────────────┐        ┌─────────────────────────┐     │
//!   │   │ LRU list, capacity p    │        │ freq buckets, capacity q│     │
//!   │   │ head=victim  tail=MRU   │        │ min-freq front = victim │     │
//!   │   └───────────┬─────────────┘        └───────────┬─────────────┘     │
//!   │        evict  │                            evict │                   │
//!   │               ▼                                  ▼                   │
//!   │   B1: ghost FIFO (cap = C)           B2: ghost FIFO (cap = C)        │
//!   │                                                                      │
//!   │   ghost hit in B1  →  p += 1, q -= 1   (workload is recency-heavy)   │
//!   │   ghost hit in B2  →  q += 1, p -= 1   (workload is frequency-heavy) │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key lifecycle
//!
//! ```text
//!            put(miss)                       hit in T1 ≥ threshold
//!  (absent) ───────────► T1 ──────────────► T1 ∩ T2 (dual residency)
//!      ▲                 │                     │
//!      │       T1 evict  ▼                     ▼ T2 evict
//!      │               B1                     B2
//!      │     ghost hit  │                     │ ghost hit
//!      └────────────────┴─────────────────────┘
//!                  (re-admitted to T1)
//! ```
//!
//! Every `put` lands in T1. A T1 hit bumps the entry's access counter; once
//! the counter reaches the promotion threshold, the value is *also*
//! installed in T2 at frequency 1. A ghost hit means a key came back shortly
//! after we evicted it, so the partition that lost it grows by one slot and
//! the other shrinks by one — bounded, reversible, self-correcting.
//!
//! ## Departures from the canonical ARC algorithm
//!
//! This engine intentionally tracks its ancestor rather than the
//! Megiddo–Modha paper:
//!
//! - **Per-partition capacities** instead of a single target parameter `p`
//!   splitting a fixed total. Both partitions start at the full configured
//!   capacity and move ±1 per ghost hit; each evicts only when it is
//!   *individually* full, so combined residency may exceed the configured
//!   capacity.
//! - **Dual residency**: promotion copies the entry into T2 without
//!   removing it from T1. `get` probes T1 first, so the T1 copy serves
//!   reads while both exist. A `put` also updates only the T1 copy; a stale
//!   T2 value can surface only after the T1 copy has been evicted.
//! - **T2 is frequency-bucketed** (LFU-style, oldest-at-minimum victim)
//!   rather than a second LRU list.
//!
//! [`ArcEngine::len`] counts both partitions, so a dually-resident key
//! contributes twice; use the per-partition accessors for exact anatomy.
//!
//! ## Thread safety
//!
//! [`ArcEngine`] is single-threaded; [`SharedArc`] serialises both
//! partitions, both ghosts, and the steering under one
//! `parking_lot::Mutex`.

mod frequency;
mod recency;

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::traits::{EngineCore, SharedCache};

use frequency::ArcFrequencyPart;
use recency::ArcRecencyPart;

/// Capacity used by [`ArcEngine::default`].
pub const DEFAULT_CAPACITY: usize = 10;

/// Promotion threshold used when none is configured.
pub const DEFAULT_PROMOTION_THRESHOLD: u64 = 2;

/// Adaptive cache core balancing a recency and a frequency partition.
pub struct ArcEngine<K, V> {
    recency: ArcRecencyPart<K, V>,
    frequency: ArcFrequencyPart<K, V>,
    capacity: usize,
    threshold: u64,
}

impl<K, V> ArcEngine<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an engine with the given capacity and promotion threshold.
    ///
    /// Both partitions start at `capacity`; each ghost list is fixed at
    /// `capacity` for the engine's lifetime.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::arc::ArcEngine;
    /// use evictkit::traits::EngineCore;
    ///
    /// let mut cache = ArcEngine::new(100, 2);
    /// cache.insert("page", vec![0u8; 16]);
    /// assert!(cache.contains(&"page"));
    /// ```
    pub fn new(capacity: usize, promotion_threshold: u64) -> Self {
        Self {
            recency: ArcRecencyPart::new(capacity, promotion_threshold),
            frequency: ArcFrequencyPart::new(capacity),
            capacity,
            threshold: promotion_threshold,
        }
    }

    /// Creates an engine with the default promotion threshold
    /// ([`DEFAULT_PROMOTION_THRESHOLD`]).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, DEFAULT_PROMOTION_THRESHOLD)
    }

    /// The configured promotion threshold.
    pub fn promotion_threshold(&self) -> u64 {
        self.threshold
    }

    /// Residents in the recency partition (T1).
    pub fn recency_len(&self) -> usize {
        self.recency.len()
    }

    /// Residents in the frequency partition (T2).
    pub fn frequency_len(&self) -> usize {
        self.frequency.len()
    }

    /// Current adaptive capacity of T1.
    pub fn recency_capacity(&self) -> usize {
        self.recency.capacity()
    }

    /// Current adaptive capacity of T2.
    pub fn frequency_capacity(&self) -> usize {
        self.frequency.capacity()
    }

    /// Keys remembered in B1 (evicted from T1).
    pub fn recency_ghost_len(&self) -> usize {
        self.recency.ghost_len()
    }

    /// Keys remembered in B2 (evicted from T2).
    pub fn frequency_ghost_len(&self) -> usize {
        self.frequency.ghost_len()
    }

    /// Ghost check and capacity steering; runs before residents are touched
    /// on every access. Returns whether a ghost was hit.
    fn steer(&mut self, key: &K) -> bool {
        if self.recency.check_ghost(key) {
            self.recency.increase_capacity();
            self.frequency.decrease_capacity();
            true
        } else if self.frequency.check_ghost(key) {
            self.frequency.increase_capacity();
            self.recency.decrease_capacity();
            true
        } else {
            false
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.recency.debug_validate_invariants();
        self.frequency.debug_validate_invariants();
    }
}

impl<K, V> EngineCore<K, V> for ArcEngine<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Steers capacities on a ghost hit, then installs into T1 at the MRU
    /// end (overwriting in place if already T1-resident).
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.steer(&key);
        self.recency.insert(key, value)
    }

    /// Steers capacities on a ghost hit, then probes T1 before T2. A T1 hit
    /// that reaches the promotion threshold mirrors the value into T2.
    fn get(&mut self, key: &K) -> Option<&V> {
        self.steer(key);
        if let Some((value, promote)) = self.recency.get(key) {
            if promote {
                self.frequency.insert(key.clone(), value.clone());
            }
            return Some(value);
        }
        self.frequency.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.recency.contains(key) || self.frequency.contains(key)
    }

    /// Residents across both partitions; a dually-resident key counts twice.
    fn len(&self) -> usize {
        self.recency.len() + self.frequency.len()
    }

    /// The construction-time capacity (each partition's starting point and
    /// both ghosts' fixed size).
    fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all residents and ghosts and restores the initial partition
    /// capacities.
    fn clear(&mut self) {
        self.recency.reset(self.capacity);
        self.frequency.reset(self.capacity);
    }
}

impl<K, V> Default for ArcEngine<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_PROMOTION_THRESHOLD)
    }
}

impl<K, V> fmt::Debug for ArcEngine<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcEngine")
            .field("capacity", &self.capacity)
            .field("recency_len", &self.recency.len())
            .field("recency_capacity", &self.recency.capacity())
            .field("frequency_len", &self.frequency.len())
            .field("frequency_capacity", &self.frequency.capacity())
            .field("recency_ghost_len", &self.recency.ghost_len())
            .field("frequency_ghost_len", &self.frequency.ghost_len())
            .finish()
    }
}

/// Thread-safe ARC cache: one mutex over both partitions and both ghosts.
pub struct SharedArc<K, V> {
    inner: Arc<Mutex<ArcEngine<K, V>>>,
}

impl<K, V> Clone for SharedArc<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedArc<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a thread-safe ARC cache.
    pub fn new(capacity: usize, promotion_threshold: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ArcEngine::new(capacity, promotion_threshold))),
        }
    }

    /// Creates a thread-safe ARC cache with the default promotion threshold.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ArcEngine::with_capacity(capacity))),
        }
    }

    /// Inserts or overwrites `key` (lands in the recency partition).
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    /// Looks up `key`, steering capacities and promoting as needed.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Whether `key` is resident in either partition.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Residents across both partitions.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` when both partitions are empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// The construction-time capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops everything and restores initial partition capacities.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V> SharedCache<K, V> for SharedArc<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        SharedArc::put(self, key, value);
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
        SharedArc::contains(self, key)
    }

    fn len(&self) -> usize {
        SharedArc::len(self)
    }

    fn capacity(&self) -> usize {
        SharedArc::capacity(self)
    }

    fn clear(&self) {
        SharedArc::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_land_in_recency_partition() {
        let mut cache = ArcEngine::new(4, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");

        assert_eq!(cache.recency_len(), 2);
        assert_eq!(cache.frequency_len(), 0);
        assert!(cache.contains(&1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn eviction_fills_the_recency_ghost() {
        let mut cache = ArcEngine::new(2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        assert_eq!(cache.recency_len(), 2);
        assert!(!cache.contains(&1));
        assert_eq!(cache.recency_ghost_len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn ghost_hit_grows_recency_capacity() {
        let mut cache = ArcEngine::new(2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c"); // 1 → B1

        cache.insert(1, "a"); // ghost hit: T1 grows, T2 shrinks
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.frequency_capacity(), 1);
        assert_eq!(cache.recency_ghost_len(), 0);

        // T1 now genuinely holds three residents.
        assert_eq!(cache.recency_len(), 3);
        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn second_hit_promotes_into_frequency_partition() {
        let mut cache = ArcEngine::new(4, 2);
        cache.insert(1, "a");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.frequency_len(), 0); // first hit: below threshold

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.frequency_len(), 1); // second hit: promoted

        // Dual residency: T1 still owns its copy.
        assert_eq!(cache.recency_len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn promoted_key_survives_recency_eviction() {
        let mut cache = ArcEngine::new(2, 2);
        cache.insert(1, "hot");
        cache.get(&1);
        cache.get(&1); // promoted into T2

        cache.insert(2, "b");
        cache.insert(3, "c"); // T1 evicts 1

        assert!(!cache.recency_contains_for_test(&1));
        assert!(cache.contains(&1)); // still served from T2
        assert_eq!(cache.get(&1), Some(&"hot"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn frequency_ghost_hit_steers_the_other_way() {
        // The recency ghost is probed first, so drive key y into B2 while
        // B1's bounded FIFO forgets it.
        let mut cache = ArcEngine::new(2, 1);
        cache.insert('x', 0);
        cache.get(&'x'); // T2 = {x}
        cache.insert('y', 0);
        cache.get(&'y'); // T2 = {x, y}
        cache.get(&'x'); // x → freq 2; T1 order [y, x]
        cache.insert('z', 0); // T1 evicts y → B1 = [y]
        cache.get(&'z'); // promoting z evicts y from T2 → B2 = [y]
        cache.insert('u', 0); // T1 evicts x → B1 = [y, x]
        cache.insert('v', 0); // T1 evicts z; B1 full, drops y → B1 = [x, z]

        assert!(!cache.contains(&'y'));
        cache.insert('y', 0); // ghost hit lands in B2 only
        assert_eq!(cache.frequency_capacity(), 3);
        assert_eq!(cache.recency_capacity(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn put_updates_only_the_recency_copy() {
        let mut cache = ArcEngine::new(2, 2);
        cache.insert(1, "old");
        cache.get(&1);
        cache.get(&1); // dual resident, T2 holds "old"

        cache.insert(1, "new");
        // T1 is probed first, so the fresh value wins while 1 stays in T1.
        assert_eq!(cache.get(&1), Some(&"new"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache = ArcEngine::new(0, 2);
        cache.insert(1, "a");
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn clear_restores_initial_capacities() {
        let mut cache = ArcEngine::new(2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");
        cache.insert(1, "a"); // steering happened

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.frequency_capacity(), 2);
        assert_eq!(cache.recency_ghost_len(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn default_matches_documented_parameters() {
        let cache: ArcEngine<u32, u32> = ArcEngine::default();
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
        assert_eq!(cache.promotion_threshold(), DEFAULT_PROMOTION_THRESHOLD);
    }

    #[test]
    fn shared_wrapper_roundtrip() {
        let cache = SharedArc::new(4, 2);
        cache.put(1, 10);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.len(), 1);
    }

    impl<K, V> ArcEngine<K, V>
    where
        K: Eq + std::hash::Hash + Clone,
        V: Clone,
    {
        fn recency_contains_for_test(&self, key: &K) -> bool {
            self.recency.contains(key)
        }
    }
}
