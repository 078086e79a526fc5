//! Deterministic key → shard mapping.
//!
//! The sharded wrapper distributes keys across independent sub-caches by
//! hashing with a fixed seed:
//!
//! ```text
//!   key ──► DefaultHasher(seed, key) ──► hash % shards ──► shard index
//! ```
//!
//! The same `(key, seed, shards)` triple always yields the same index, and
//! with a reasonable `Hash` impl the distribution is close to uniform. The
//! shard count is clamped to at least 1 so selection never divides by zero.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Per-shard capacity for a total of `total` entries over `shards` shards.
///
/// Rounds up, so the shards together can hold at least `total` entries
/// (and at most `shards - 1` more).
pub fn per_shard_capacity(total: usize, shards: usize) -> usize {
    total.div_ceil(shards.max(1))
}

/// Seeded, deterministic shard selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector over `shards` shards (clamped to at least 1).
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Number of shards keys are mapped onto.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps `key` to an index in `[0, shard_count)`.
    pub fn shard_for<K: Hash + ?Sized>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards
    }
}

impl Default for ShardSelector {
    fn default() -> Self {
        Self::new(1, 0)
    }
}
