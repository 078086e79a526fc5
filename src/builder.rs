//! Unified builder over the four eviction engines.
//!
//! The tagged-sum alternative to holding a `dyn` [`SharedCache`]: a
//! [`Cache`] owns one concrete engine behind an enum, so callers pick the
//! policy at runtime without dynamic dispatch or a lock.
//!
//! ## Example
//!
//! ```
//! use evictkit::builder::{CacheBuilder, EvictionPolicy};
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(EvictionPolicy::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```
//!
//! [`SharedCache`]: crate::traits::SharedCache

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::arc::{ArcEngine, DEFAULT_PROMOTION_THRESHOLD};
use crate::policy::lfu::{DEFAULT_MAX_AVG_FREQ, LfuEngine};
use crate::policy::lru::LruEngine;
use crate::policy::lru_k::LruKEngine;
use crate::traits::{EngineCore, MutableEngine};

/// Available eviction disciplines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Least Recently Used.
    Lru,
    /// LRU gated by a K-admissions history.
    LruK { history_capacity: usize, k: u64 },
    /// Least Frequently Used with aging.
    Lfu { max_avg_freq: u64 },
    /// Adaptive replacement (recency/frequency partitions + ghosts).
    Arc { promotion_threshold: u64 },
}

impl EvictionPolicy {
    /// LRU-K with a history twice the main capacity and the conventional
    /// K = 2.
    pub fn lru_k_default(capacity: usize) -> Self {
        Self::LruK {
            history_capacity: capacity * 2,
            k: 2,
        }
    }

    /// LFU with the default aging bound.
    pub fn lfu_default() -> Self {
        Self::Lfu {
            max_avg_freq: DEFAULT_MAX_AVG_FREQ,
        }
    }

    /// ARC with the default promotion threshold.
    pub fn arc_default() -> Self {
        Self::Arc {
            promotion_threshold: DEFAULT_PROMOTION_THRESHOLD,
        }
    }
}

/// One engine behind a policy tag.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Lru(LruEngine<K, V>),
    LruK(LruKEngine<K, V>),
    Lfu(LfuEngine<K, V>),
    Arc(ArcEngine<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Inserts a key-value pair, returning the previous value on overwrite.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(engine) => engine.insert(key, value),
            CacheInner::LruK(engine) => engine.insert(key, value),
            CacheInner::Lfu(engine) => engine.insert(key, value),
            CacheInner::Arc(engine) => engine.insert(key, value),
        }
    }

    /// Looks up `key` under the selected policy's access rules.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(engine) => engine.get(key),
            CacheInner::LruK(engine) => engine.get(key),
            CacheInner::Lfu(engine) => engine.get(key),
            CacheInner::Arc(engine) => engine.get(key),
        }
    }

    /// Whether `key` is resident.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(engine) => engine.contains(key),
            CacheInner::LruK(engine) => engine.contains(key),
            CacheInner::Lfu(engine) => engine.contains(key),
            CacheInner::Arc(engine) => engine.contains(key),
        }
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(engine) => engine.len(),
            CacheInner::LruK(engine) => engine.len(),
            CacheInner::Lfu(engine) => engine.len(),
            CacheInner::Arc(engine) => engine.len(),
        }
    }

    /// `true` when nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(engine) => engine.capacity(),
            CacheInner::LruK(engine) => engine.capacity(),
            CacheInner::Lfu(engine) => engine.capacity(),
            CacheInner::Arc(engine) => engine.capacity(),
        }
    }

    /// Removes `key` where the policy supports arbitrary removal.
    ///
    /// Returns `None` for ARC, which has no removal operation.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(engine) => engine.remove(key),
            CacheInner::LruK(engine) => engine.remove(key),
            CacheInner::Lfu(engine) => engine.remove(key),
            CacheInner::Arc(_) => None,
        }
    }

    /// Drops every resident entry.
    pub fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(engine) => engine.clear(),
            CacheInner::LruK(engine) => engine.clear(),
            CacheInner::Lfu(engine) => engine.clear(),
            CacheInner::Arc(engine) => engine.clear(),
        }
    }
}

/// Builder carrying the capacity shared by every policy.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for caches of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the selected policy, clamping out-of-range
    /// parameters (K and the aging bound are raised to 1).
    pub fn build<K, V>(self, policy: EvictionPolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruEngine::new(self.capacity)),
            EvictionPolicy::LruK {
                history_capacity,
                k,
            } => CacheInner::LruK(LruKEngine::new(self.capacity, history_capacity, k)),
            EvictionPolicy::Lfu { max_avg_freq } => {
                CacheInner::Lfu(LfuEngine::with_max_avg_freq(self.capacity, max_avg_freq))
            },
            EvictionPolicy::Arc {
                promotion_threshold,
            } => CacheInner::Arc(ArcEngine::new(self.capacity, promotion_threshold)),
        };
        Cache { inner }
    }

    /// Builds a cache, rejecting invalid parameters instead of clamping.
    pub fn try_build<K, V>(self, policy: EvictionPolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruEngine::new(self.capacity)),
            EvictionPolicy::LruK {
                history_capacity,
                k,
            } => CacheInner::LruK(LruKEngine::try_new(self.capacity, history_capacity, k)?),
            EvictionPolicy::Lfu { max_avg_freq } => {
                CacheInner::Lfu(LfuEngine::try_new(self.capacity, max_avg_freq)?)
            },
            EvictionPolicy::Arc {
                promotion_threshold,
            } => CacheInner::Arc(ArcEngine::new(self.capacity, promotion_threshold)),
        };
        Ok(Cache { inner })
    }
}
