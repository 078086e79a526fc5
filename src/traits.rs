//! # Cache engine trait hierarchy
//!
//! Two layers of abstraction cover the whole library:
//!
//! ```text
//!                 ┌────────────────────────────────────┐
//!                 │          EngineCore<K, V>          │
//!                 │                                    │
//!                 │  insert(&mut, K, V) → Option<V>    │
//!                 │  get(&mut, &K) → Option<&V>        │
//!                 │  contains / len / capacity / clear │
//!                 └──────────────────┬─────────────────┘
//!                                    │
//!                                    ▼
//!                 ┌────────────────────────────────────┐
//!                 │        MutableEngine<K, V>         │
//!                 │                                    │
//!                 │  remove(&K) → Option<V>            │
//!                 │  remove_batch(&[K])                │
//!                 └────────────────────────────────────┘
//!
//!                 ┌────────────────────────────────────┐
//!                 │     SharedCache<K, V>: Send+Sync   │
//!                 │                                    │
//!                 │  put(&self, K, V)                  │
//!                 │  get_into(&self, &K, &mut V) → bool│
//!                 │  get(&self, &K) → V   (on Default) │
//!                 │  contains / len / capacity / clear │
//!                 └────────────────────────────────────┘
//! ```
//!
//! [`EngineCore`] is the single-threaded policy contract. Every eviction
//! engine implements it; the sharded wrapper composes cores rather than being
//! one. [`MutableEngine`] adds arbitrary key removal for the engines whose
//! ordering semantics tolerate it.
//!
//! [`SharedCache`] is the external boundary: a dyn-compatible, `&self`
//! interface over the thread-safe wrappers. Callers that want policy
//! polymorphism hold an `Arc<dyn SharedCache<K, V>>` (or use the tagged-sum
//! [`Cache`](crate::builder::Cache) when dynamic dispatch is unwanted).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use evictkit::policy::lru::SharedLru;
//! use evictkit::traits::SharedCache;
//!
//! let cache: Arc<dyn SharedCache<u64, String>> = Arc::new(SharedLru::new(128));
//! cache.put(1, "one".to_string());
//!
//! let mut out = String::new();
//! assert!(cache.get_into(&1, &mut out));
//! assert_eq!(out, "one");
//!
//! // Convenience form: default-constructed on miss.
//! assert_eq!(cache.get(&404), String::new());
//! ```

/// Core operations every eviction engine supports.
///
/// Implementations update their ordering state on access, so `get` takes
/// `&mut self`; use [`contains`](Self::contains) for a lookup that must not
/// disturb eviction order.
pub trait EngineCore<K, V> {
    /// Inserts a key-value pair, returning the previous value on overwrite.
    ///
    /// At capacity, a victim is evicted according to the engine's policy
    /// before the new entry is admitted. With capacity 0 this is a no-op.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, updating recency/frequency state on a hit.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Whether `key` is resident. Never touches eviction state.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    /// `true` when no entry is resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    fn capacity(&self) -> usize;

    /// Drops every resident entry.
    fn clear(&mut self);
}

/// Engines that allow arbitrary key removal.
pub trait MutableEngine<K, V>: EngineCore<K, V> {
    /// Removes `key`, returning its value if it was resident.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys, returning each outcome in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// The uniform, thread-safe cache boundary.
///
/// Implemented by the per-engine shared wrappers and the sharded wrapper.
/// All methods take `&self`; serialisation happens behind each engine's
/// mutex. On a miss, `get_into` leaves `out` untouched and the provided
/// [`get`](Self::get) hands back `V::default()`.
pub trait SharedCache<K, V>: Send + Sync {
    /// Inserts or overwrites `key`. Eviction may occur; nothing is returned.
    fn put(&self, key: K, value: V);

    /// Copies the value for `key` into `out`, returning whether it was a hit.
    fn get_into(&self, key: &K, out: &mut V) -> bool;

    /// Looks up `key`, returning a default-constructed value on a miss.
    fn get(&self, key: &K) -> V
    where
        V: Default,
    {
        let mut value = V::default();
        self.get_into(key, &mut value);
        value
    }

    /// Whether `key` is resident.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    /// `true` when no entry is resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    fn capacity(&self) -> usize;

    /// Drops every resident entry.
    fn clear(&self);
}
