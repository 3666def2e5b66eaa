//! Cache Module
//!
//! Two LRU stores with TTL expiration, one in-process and one in Redis, kept
//! in step by the [`DualCache`] coordinator.

mod dual;
mod entry;
mod local;
mod lru;
pub mod remote;
mod stats;


// Re-export public types
pub use dual::{DualCache, DualStats};
pub use entry::CacheEntry;
pub use local::LocalStore;
pub use lru::LruTracker;
pub use remote::{MemoryBackend, RedisBackend, RemoteBackend, RemoteStore};
pub use stats::CacheStats;
