//! Dual Cache - A key-value cache server over two consistency-checked LRU stores
//!
//! Every write goes to an in-process LRU and a Redis-backed LRU concurrently;
//! a read only hits when both stores return the same value.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::DualCache;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
