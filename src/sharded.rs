//! # Sharded cache wrapper
//!
//! Partitions a keyspace across `N` independent sub-engines to spread lock
//! contention:
//!
//! ```text
//!                        ┌──────────────────────────────┐
//!    put(k, v) ────────► │  selector: hash(seed, k) % N │
//!    get(k)    ────────► └──────────────┬───────────────┘
//!                                       ▼
//!        ┌───────────┬───────────┬───────────┬───────────┐
//!        │  Mutex<C> │  Mutex<C> │  Mutex<C> │  Mutex<C> │
//!        │  shard 0  │  shard 1  │  shard 2  │  shard 3  │
//!        └───────────┴───────────┴───────────┴───────────┘
//!           each shard: one engine of capacity ⌈C/N⌉
//! ```
//!
//! The wrapper holds no lock of its own; an operation hashes the key, locks
//! exactly one shard, and delegates. There are no cross-shard invariants —
//! two keys on different shards never contend and never evict each other.
//! `len` and `clear` visit every shard without freezing them collectively,
//! so a concurrent `len` is a momentary sum, not a snapshot.
//!
//! A shard count of 0 asks for one shard per unit of available hardware
//! parallelism.

use std::hash::Hash;
use std::thread;

use parking_lot::Mutex;

use crate::ds::shard::{ShardSelector, per_shard_capacity};
use crate::policy::arc::ArcEngine;
use crate::policy::lfu::LfuEngine;
use crate::policy::lru::LruEngine;
use crate::policy::lru_k::LruKEngine;
use crate::traits::{EngineCore, SharedCache};

/// Hash-partitioned array of sub-engines, one mutex per shard.
///
/// # Example
///
/// ```
/// use evictkit::sharded::Sharded;
///
/// let cache = Sharded::lru::<u64, String>(1000, 8);
/// cache.put(1, "one".to_string());
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// assert_eq!(cache.shard_count(), 8);
/// ```
pub struct Sharded<C> {
    shards: Vec<Mutex<C>>,
    selector: ShardSelector,
}

/// Resolves a requested shard count: 0 means "one per hardware thread".
fn resolve_shard_count(shards: usize) -> usize {
    if shards > 0 {
        shards
    } else {
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    }
}

impl<C> Sharded<C> {
    /// Builds a wrapper over `shards` sub-engines (0 = hardware default).
    ///
    /// `build` is called once per shard with the per-shard capacity
    /// `⌈capacity / shards⌉`.
    pub fn with_engines(
        capacity: usize,
        shards: usize,
        mut build: impl FnMut(usize) -> C,
    ) -> Self {
        let shards = resolve_shard_count(shards);
        let per_shard = per_shard_capacity(capacity, shards);
        Self {
            shards: (0..shards).map(|_| Mutex::new(build(per_shard))).collect(),
            selector: ShardSelector::new(shards, 0),
        }
    }

    /// Number of shards keys are spread over.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

impl Sharded<()> {
    /// Sharded LRU: `shards` sub-caches of `⌈capacity / shards⌉` each.
    pub fn lru<K, V>(capacity: usize, shards: usize) -> Sharded<LruEngine<K, V>>
    where
        K: Eq + Hash + Clone,
    {
        Sharded::with_engines(capacity, shards, LruEngine::new)
    }

    /// Sharded LRU-K; the history capacity is split across shards the same
    /// way the main capacity is.
    pub fn lru_k<K, V>(
        capacity: usize,
        history_capacity: usize,
        k: u64,
        shards: usize,
    ) -> Sharded<LruKEngine<K, V>>
    where
        K: Eq + Hash + Clone,
    {
        let resolved = resolve_shard_count(shards);
        let history_per_shard = per_shard_capacity(history_capacity, resolved);
        Sharded::with_engines(capacity, resolved, |per_shard| {
            LruKEngine::new(per_shard, history_per_shard, k)
        })
    }

    /// Sharded LFU with a shared aging bound.
    pub fn lfu<K, V>(capacity: usize, max_avg_freq: u64, shards: usize) -> Sharded<LfuEngine<K, V>>
    where
        K: Eq + Hash + Clone,
    {
        Sharded::with_engines(capacity, shards, |per_shard| {
            LfuEngine::with_max_avg_freq(per_shard, max_avg_freq)
        })
    }

    /// Sharded ARC with a shared promotion threshold.
    pub fn arc<K, V>(
        capacity: usize,
        promotion_threshold: u64,
        shards: usize,
    ) -> Sharded<ArcEngine<K, V>>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        Sharded::with_engines(capacity, shards, |per_shard| {
            ArcEngine::new(per_shard, promotion_threshold)
        })
    }
}

impl<C> Sharded<C> {
    fn shard_for<K: Hash>(&self, key: &K) -> &Mutex<C> {
        &self.shards[self.selector.shard_for(key)]
    }

    /// Inserts or overwrites `key` in its shard.
    pub fn put<K, V>(&self, key: K, value: V)
    where
        C: EngineCore<K, V>,
        K: Hash,
    {
        self.shard_for(&key).lock().insert(key, value);
    }

    /// Inserts `key`, returning the previous value on overwrite.
    pub fn insert<K, V>(&self, key: K, value: V) -> Option<V>
    where
        C: EngineCore<K, V>,
        K: Hash,
    {
        self.shard_for(&key).lock().insert(key, value)
    }

    /// Looks up `key` in its shard.
    pub fn get<K, V>(&self, key: &K) -> Option<V>
    where
        C: EngineCore<K, V>,
        K: Hash,
        V: Clone,
    {
        self.shard_for(key).lock().get(key).cloned()
    }

    /// Whether `key` is resident in its shard.
    pub fn contains<K, V>(&self, key: &K) -> bool
    where
        C: EngineCore<K, V>,
        K: Hash,
    {
        self.shard_for(key).lock().contains(key)
    }

    /// Total residents across all shards (momentary, not a snapshot).
    pub fn len<K, V>(&self) -> usize
    where
        C: EngineCore<K, V>,
    {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// `true` when every shard is empty.
    pub fn is_empty<K, V>(&self) -> bool
    where
        C: EngineCore<K, V>,
    {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Combined capacity: the sum of per-shard capacities, which rounding
    /// can place up to `shards - 1` above the requested total.
    pub fn capacity<K, V>(&self) -> usize
    where
        C: EngineCore<K, V>,
    {
        self.shards
            .iter()
            .map(|shard| shard.lock().capacity())
            .sum()
    }

    /// Clears every shard in turn.
    pub fn clear<K, V>(&self)
    where
        C: EngineCore<K, V>,
    {
        for shard in &self.shards {
            shard.lock().clear();
        }
    }
}

impl<K, V, C> SharedCache<K, V> for Sharded<C>
where
    C: EngineCore<K, V> + Send,
    K: Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn put(&self, key: K, value: V) {
        Sharded::put(self, key, value);
    }

    fn get_into(&self, key: &K, out: &mut V) -> bool {
        let mut shard = self.shard_for(key).lock();
        match shard.get(key) {
            Some(value) => {
                out.clone_from(value);
                true
            },
            None => false,
        }
    }

    fn contains(&self, key: &K) -> bool {
        Sharded::contains(self, key)
    }

    fn len(&self) -> usize {
        Sharded::len::<K, V>(self)
    }

    fn capacity(&self) -> usize {
        Sharded::capacity::<K, V>(self)
    }

    fn clear(&self) {
        Sharded::clear::<K, V>(self);
    }
}
