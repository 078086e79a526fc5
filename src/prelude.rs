pub use crate::builder::{Cache, CacheBuilder, EvictionPolicy};
pub use crate::ds::{FreqBuckets, GhostList, RecencyList, ShardSelector, SlotArena, SlotId};
pub use crate::policy::{
    ArcEngine, LfuEngine, LruEngine, LruKEngine, SharedArc, SharedLfu, SharedLru, SharedLruK,
};
pub use crate::sharded::Sharded;
pub use crate::traits::{EngineCore, MutableEngine, SharedCache};
