//! # Least Frequently Used (LFU) cache engine with aging
//!
//! Values are keyed in a hash map while a [`FreqBuckets`] structure tracks
//! each key's access frequency and the eviction order:
//!
//! ```text
//!   ┌──────────────────────────────┐    ┌─────────────────────────────────┐
//!   │  values: FxHashMap<K, V>     │    │  order: FreqBuckets<K>          │
//!   │                              │    │                                 │
//!   │  key ──► value               │    │  freq 1: [oldest .. newest]     │
//!   └──────────────────────────────┘    │  freq 3: [oldest .. newest]     │
//!                                       │  freq 7: [ .. ]                 │
//!                                       │     ▲                           │
//!                                       │     └── min_freq cursor         │
//!                                       └─────────────────────────────────┘
//! ```
//!
//! On eviction the victim is the *oldest* key in the minimum-frequency
//! bucket. New entries start at frequency 1, which also resets the minimum
//! cursor to 1.
//!
//! ## Aging
//!
//! A long-lived key can accumulate so much frequency that nothing ever
//! displaces it. The engine keeps a running total of all frequencies; after
//! every insert or bump it derives the integer average `total_freq / len`,
//! and once that exceeds `max_avg_freq` every frequency is reduced by
//! `max_avg_freq / 2` (never below 1), buckets are rebuilt, and the total is
//! recomputed from the decayed frequencies. Stale hot keys drift back toward
//! the eviction end instead of squatting forever.
//!
//! The aging sweep is O(n); every other operation is O(1) amortised (bucket
//! creation is a `BTreeMap` insert, O(log n) in the number of distinct
//! frequencies).
//!
//! ## Thread safety
//!
//! [`LfuEngine`] is single-threaded; [`SharedLfu`] puts the whole engine
//! behind one `parking_lot::Mutex`.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::freq_buckets::FreqBuckets;
use crate::error::ConfigError;
use crate::traits::{EngineCore, MutableEngine, SharedCache};

/// Aging bound used when none is configured.
pub const DEFAULT_MAX_AVG_FREQ: u64 = 10;

/// Frequency-ordered cache core with periodic aging.
pub struct LfuEngine<K, V> {
    values: FxHashMap<K, V>,
    order: FreqBuckets<K>,
    capacity: usize,
    max_avg_freq: u64,
    total_freq: u64,
}

impl<K, V> LfuEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with the default aging bound
    /// ([`DEFAULT_MAX_AVG_FREQ`]).
    pub fn new(capacity: usize) -> Self {
        Self::with_max_avg_freq(capacity, DEFAULT_MAX_AVG_FREQ)
    }

    /// Creates an engine that ages once the average frequency exceeds
    /// `max_avg_freq` (clamped to at least 1).
    pub fn with_max_avg_freq(capacity: usize, max_avg_freq: u64) -> Self {
        Self {
            values: FxHashMap::default(),
            order: FreqBuckets::new(),
            capacity,
            max_avg_freq: max_avg_freq.max(1),
            total_freq: 0,
        }
    }

    /// Fallible constructor: rejects `max_avg_freq == 0`.
    pub fn try_new(capacity: usize, max_avg_freq: u64) -> Result<Self, ConfigError> {
        if max_avg_freq == 0 {
            return Err(ConfigError::new("lfu max_avg_freq must be at least 1"));
        }
        Ok(Self::with_max_avg_freq(capacity, max_avg_freq))
    }

    /// Current access frequency of `key`, if resident.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.order.frequency(key)
    }

    /// Configured aging bound.
    pub fn max_avg_freq(&self) -> u64 {
        self.max_avg_freq
    }

    /// Integer average frequency across residents (0 when empty).
    pub fn average_frequency(&self) -> u64 {
        if self.values.is_empty() {
            0
        } else {
            self.total_freq / self.values.len() as u64
        }
    }

    /// Evicts and returns the current victim (oldest at minimum frequency).
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        let (key, freq) = self.order.pop_min()?;
        self.total_freq -= freq;
        let value = self.values.remove(&key)?;
        Some((key, value))
    }

    /// The entry `pop_min` would evict, without removing it.
    pub fn peek_min(&self) -> Option<(&K, &V)> {
        let (key, _) = self.order.peek_min()?;
        let value = self.values.get(key)?;
        Some((key, value))
    }

    /// Counts one access and runs the aging check.
    fn note_access(&mut self) {
        self.total_freq += 1;
        let len = self.values.len() as u64;
        if len == 0 {
            return;
        }
        if self.total_freq / len > self.max_avg_freq {
            let decay = self.max_avg_freq / 2;
            self.total_freq = self.order.age_all(decay);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.values.len(), self.order.len(), "values/order size skew");
        assert!(self.values.len() <= self.capacity, "resident count over capacity");
        let mut total = 0u64;
        for key in self.values.keys() {
            total += self.order.frequency(key).expect("value without frequency");
        }
        assert_eq!(total, self.total_freq, "total_freq out of sync");
        self.order.debug_validate_invariants();
    }
}

impl<K, V> EngineCore<K, V> for LfuEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.values.get_mut(&key) {
            let previous = std::mem::replace(slot, value);
            self.order.touch(&key);
            self.note_access();
            return Some(previous);
        }

        if self.capacity == 0 {
            return None;
        }
        if self.values.len() >= self.capacity {
            if let Some((victim, freq)) = self.order.pop_min() {
                self.values.remove(&victim);
                self.total_freq -= freq;
            }
        }

        self.order.insert(key.clone());
        self.values.insert(key, value);
        self.note_access();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if !self.values.contains_key(key) {
            return None;
        }
        self.order.touch(key);
        self.note_access();
        self.values.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.values.clear();
        self.order.clear();
        self.total_freq = 0;
    }
}

impl<K, V> MutableEngine<K, V> for LfuEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let freq = self.order.remove(key)?;
        self.total_freq -= freq;
        self.values.remove(key)
    }
}

impl<K, V> fmt::Debug for LfuEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuEngine")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("max_avg_freq", &self.max_avg_freq)
            .field("average_frequency", &self.average_frequency())
            .finish_non_exhaustive()
    }
}

/// Thread-safe LFU cache: one mutex over values, buckets, and counters.
pub struct SharedLfu<K, V> {
    inner: Arc<Mutex<LfuEngine<K, V>>>,
}

impl<K, V> Clone for SharedLfu<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLfu<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a thread-safe LFU cache with the default aging bound.
    pub fn new(capacity: usize) -> Self {
        Self::with_max_avg_freq(capacity, DEFAULT_MAX_AVG_FREQ)
    }

    /// Creates a thread-safe LFU cache with an explicit aging bound.
    pub fn with_max_avg_freq(capacity: usize, max_avg_freq: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LfuEngine::with_max_avg_freq(
                capacity,
                max_avg_freq,
            ))),
        }
    }

    /// Inserts or overwrites `key`.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    /// Looks up `key`, bumping its frequency on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Removes `key`, returning its value if resident.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Current access frequency of `key`.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Whether `key` is resident.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` when nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops every resident entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V> SharedCache<K, V> for SharedLfu<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        SharedLfu::put(self, key, value);
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
        SharedLfu::contains(self, key)
    }

    fn len(&self) -> usize {
        SharedLfu::len(self)
    }

    fn capacity(&self) -> usize {
        SharedLfu::capacity(self)
    }

    fn clear(&self) {
        SharedLfu::clear(self);
    }
}
