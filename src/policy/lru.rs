//! # Least Recently Used (LRU) cache engine
//!
//! The baseline recency engine: a key index over an arena-backed doubly
//! linked list. Everything recency-shaped in this crate (LRU-K's two halves,
//! ARC's recency partition) is a variation on this layout.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                         LruEngine<K, V>                           │
//!   │                                                                   │
//!   │   ┌───────────────────────────────────────────────────────────┐   │
//!   │   │  index: FxHashMap<K, SlotId>                              │   │
//!   │   │                                                           │   │
//!   │   │  ┌─────────┬──────────┐                                   │   │
//!   │   │  │   Key   │  SlotId  │──────────────┐                    │   │
//!   │   │  └─────────┴──────────┘              │                    │   │
//!   │   └───────────────────────────────────────┼───────────────────┘   │
//!   │                                           ▼                       │
//!   │   ┌───────────────────────────────────────────────────────────┐   │
//!   │   │  list: RecencyList<Entry { key, value, access_count }>    │   │
//!   │   │                                                           │   │
//!   │   │  head ──► [victim] ◄──► [ .. ] ◄──► [newest] ◄── tail     │   │
//!   │   │           (LRU)                       (MRU)               │   │
//!   │   └───────────────────────────────────────────────────────────┘   │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation flow
//!
//! ```text
//!   insert(k, v), k resident:   overwrite value, move node to tail
//!   insert(k, v), k absent:     evict head if full, append node at tail
//!   get(k):                     move node to tail, return value
//!   peek(k):                    return value, order untouched
//! ```
//!
//! ## Complexity
//!
//! | Operation     | Time     | Notes                               |
//! |---------------|----------|-------------------------------------|
//! | `insert`      | O(1) avg | index upsert + list splice          |
//! | `get` / `touch` | O(1) avg | index lookup + move_to_back       |
//! | `peek`        | O(1) avg | no reordering                       |
//! | `remove`      | O(1) avg | index remove + unlink               |
//! | `pop_victim`  | O(1)     | head removal                        |
//! | `clear`       | O(n)     |                                     |
//!
//! ## Edge behaviour
//!
//! - Capacity 0 disables the cache: every insert is a no-op, every get a
//!   miss.
//! - Overwriting a resident key never grows the cache and counts as an
//!   access (the entry moves to the MRU position).
//!
//! ## Thread safety
//!
//! [`LruEngine`] is single-threaded. [`SharedLru`] wraps it in a single
//! `parking_lot::Mutex` covering the whole engine state; `get` reorders the
//! list, so even reads serialise through the lock.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::traits::{EngineCore, MutableEngine, SharedCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    access_count: u64,
}

/// Recency-ordered cache core. Tail of the internal list is MRU, head is the
/// eviction victim.
pub struct LruEngine<K, V> {
    index: FxHashMap<K, SlotId>,
    list: RecencyList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine holding at most `capacity` entries.
    ///
    /// Capacity 0 disables the cache.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruEngine;
    /// use evictkit::traits::EngineCore;
    ///
    /// let mut cache: LruEngine<u32, String> = LruEngine::new(100);
    /// cache.insert(1, "page".to_string());
    /// assert_eq!(cache.get(&1), Some(&"page".to_string()));
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::default(),
            list: RecencyList::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the value for `key` without refreshing its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Marks `key` as most recently used without returning its value.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_back(id),
            None => false,
        }
    }

    /// Evicts and returns the least recently used entry.
    pub fn pop_victim(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_front()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// The entry `pop_victim` would evict, without removing it.
    pub fn peek_victim(&self) -> Option<(&K, &V)> {
        self.list.front().map(|entry| (&entry.key, &entry.value))
    }

    /// How many times `key` has been hit since it was admitted.
    pub fn access_count(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| entry.access_count)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.list.len(), "index/list size skew");
        assert!(self.list.len() <= self.capacity, "resident count over capacity");
        for entry in self.list.iter() {
            assert!(
                self.index.contains_key(&entry.key),
                "listed key missing from index"
            );
        }
        self.list.debug_validate_invariants();
    }
}

impl<K, V> EngineCore<K, V> for LruEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            let entry = self.list.get_mut(id)?;
            let previous = std::mem::replace(&mut entry.value, value);
            entry.access_count += 1;
            self.list.move_to_back(id);
            return Some(previous);
        }

        if self.capacity == 0 {
            return None;
        }
        if self.list.len() >= self.capacity {
            if let Some(victim) = self.list.pop_front() {
                self.index.remove(&victim.key);
            }
        }

        let id = self.list.push_back(Entry {
            key: key.clone(),
            value,
            access_count: 0,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_back(id);
        let entry = self.list.get_mut(id)?;
        entry.access_count += 1;
        self.list.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableEngine<K, V> for LruEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> fmt::Debug for LruEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruEngine")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU cache: one mutex over the whole engine state.
///
/// Clones share the same underlying engine.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::SharedLru;
///
/// let cache: SharedLru<u32, String> = SharedLru::new(100);
/// cache.put(1, "one".to_string());
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// ```
pub struct SharedLru<K, V> {
    inner: Arc<Mutex<LruEngine<K, V>>>,
}

impl<K, V> Clone for SharedLru<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLru<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a thread-safe LRU cache with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LruEngine::new(capacity))),
        }
    }

    /// Inserts or overwrites `key`.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    /// Inserts `key`, returning the previous value on overwrite.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Looks up `key`, refreshing its recency on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns the value for `key` without refreshing its recency.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    /// Removes `key`, returning its value if resident.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Marks `key` as most recently used.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    /// Evicts and returns the least recently used entry.
    pub fn pop_victim(&self) -> Option<(K, V)> {
        self.inner.lock().pop_victim()
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

impl<K, V> SharedCache<K, V> for SharedLru<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        SharedLru::put(self, key, value);
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
        SharedLru::contains(self, key)
    }

    fn len(&self) -> usize {
        SharedLru::len(self)
    }

    fn capacity(&self) -> usize {
        SharedLru::capacity(self)
    }

    fn clear(&self) {
        SharedLru::clear(self);
    }
}

impl<K, V> fmt::Debug for SharedLru<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.inner.lock();
        f.debug_struct("SharedLru")
            .field("len", &engine.len())
            .field("capacity", &engine.capacity())
            .finish_non_exhaustive()
    }
}
