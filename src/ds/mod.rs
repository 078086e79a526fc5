pub mod freq_buckets;
pub mod ghost_list;
pub mod recency_list;
pub mod shard;
pub mod slot_arena;

pub use freq_buckets::FreqBuckets;
pub use ghost_list::GhostList;
pub use recency_list::{RecencyIter, RecencyList};
pub use shard::{ShardSelector, per_shard_capacity};
pub use slot_arena::{SlotArena, SlotId};
