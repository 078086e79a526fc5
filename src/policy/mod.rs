pub mod arc;
pub mod lfu;
pub mod lru;
pub mod lru_k;

pub use arc::{ArcEngine, SharedArc};
pub use lfu::{LfuEngine, SharedLfu};
pub use lru::{LruEngine, SharedLru};
pub use lru_k::{LruKEngine, SharedLruK};
