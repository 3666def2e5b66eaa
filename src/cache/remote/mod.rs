//! Remote Store Module
//!
//! LRU cache layered on a remote ordered list plus key-value primitive.
//!
//! Values live at `<namespace>:v:<key>` with native expiry; recency lives in
//! the list `<namespace>:order` (front = most recent). The two prefixes are
//! disjoint, so no user key can land on the list. The primitive has no
//! move-to-front, so every hit or write repositions a key with
//! remove-all + push-front, which costs O(list length).

mod backend;
mod memory;
mod redis_backend;

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CacheError, Result};

pub use backend::{BackendHandle, RemoteBackend};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;

/// TTL value meaning "never expire" on the remote side.
pub const NO_EXPIRATION: i64 = -1;

/// Longest accepted TTL (100 years). Redis `EX` rejects values whose
/// millisecond deadline overflows; this stays far below that.
pub const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// Maps a caller TTL onto native expiry: `-1` is none, `1..=MAX_TTL_SECONDS`
/// is seconds, anything else is rejected.
pub fn validate_ttl(ttl: i64) -> Result<Option<u64>> {
    match ttl {
        NO_EXPIRATION => Ok(None),
        secs @ 1..=MAX_TTL_SECONDS => Ok(Some(secs as u64)),
        other => Err(CacheError::InvalidTtl(other)),
    }
}

// == Remote Store ==
/// LRU store kept in a remote service.
pub struct RemoteStore {
    backend: BackendHandle,
    namespace: String,
    order_key: String,
    flush_all: bool,
}

impl RemoteStore {
    // == Constructor ==
    /// Creates a store whose keys are scoped under `namespace`.
    pub fn new(backend: BackendHandle, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            order_key: format!("{}:order", namespace),
            backend,
            namespace,
            flush_all: false,
        }
    }

    /// Makes [`del_all`](Self::del_all) flush the whole remote instance
    /// instead of this namespace.
    pub fn with_flush_all(mut self, flush_all: bool) -> Self {
        self.flush_all = flush_all;
        self
    }

    /// Convenience constructor over a fresh [`MemoryBackend`].
    pub fn in_memory(namespace: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), namespace)
    }

    pub fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn value_key(&self, key: &str) -> String {
        format!("{}:v:{}", self.namespace, key)
    }

    async fn move_to_front(&self, key: &str) -> Result<()> {
        self.backend.remove_all(&self.order_key, key).await?;
        self.backend.push_front(&self.order_key, key).await
    }

    // == Set ==
    /// Stores `value` and moves `key` to the front, then evicts down to `capacity`.
    ///
    /// `ttl` must be `-1` (no expiry) or in `1..=MAX_TTL_SECONDS`; other values
    /// fail with [`CacheError::InvalidTtl`] before anything is written.
    pub async fn set(&self, key: &str, value: &str, capacity: usize, ttl: i64) -> Result<()> {
        let ttl_seconds = validate_ttl(ttl)?;

        // Value first: a concurrent eviction scan drops listed keys whose value is missing
        self.backend
            .set(&self.value_key(key), value, ttl_seconds)
            .await?;
        // Remove unconditionally so a natively expired leftover can't duplicate the key
        self.move_to_front(key).await?;

        self.evict(capacity).await
    }

    // == Evict ==
    /// Drops keys whose values expired natively, then pops from the back
    /// until the order list fits in `capacity`.
    async fn evict(&self, capacity: usize) -> Result<()> {
        for key in self.backend.range_all(&self.order_key).await? {
            if !self.backend.exists(&self.value_key(&key)).await? {
                self.backend.remove_all(&self.order_key, &key).await?;
            }
        }

        let mut len = self.backend.list_len(&self.order_key).await?;
        while len > capacity {
            let Some(oldest) = self.backend.pop_back(&self.order_key).await? else {
                break;
            };
            self.backend.delete(&self.value_key(&oldest)).await?;
            debug!(key = %oldest, "remote: evicted least recently used entry");
            len = self.backend.list_len(&self.order_key).await?;
        }
        Ok(())
    }

    // == Get ==
    /// Returns the value on a hit and moves the key to the front.
    /// Misses leave the order list untouched.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(value) = self.backend.get(&self.value_key(key)).await? else {
            return Ok(None);
        };
        self.move_to_front(key).await?;
        Ok(Some(value))
    }

    // == Delete ==
    pub async fn del(&self, key: &str) -> Result<()> {
        let value_key = self.value_key(key);
        if self.backend.exists(&value_key).await? {
            self.backend.remove_all(&self.order_key, key).await?;
            self.backend.delete(&value_key).await?;
        }
        Ok(())
    }

    // == Delete All ==
    pub async fn del_all(&self) -> Result<()> {
        if self.flush_all {
            info!("remote: flushing entire instance");
            self.backend.flush_all().await
        } else {
            self.reset().await
        }
    }

    // == Reset ==
    /// Deletes every listed value and the order list itself.
    pub async fn reset(&self) -> Result<()> {
        let keys = self.backend.range_all(&self.order_key).await?;
        for key in &keys {
            self.backend.delete(&self.value_key(key)).await?;
        }
        self.backend.delete(&self.order_key).await?;
        debug!(namespace = %self.namespace, removed = keys.len(), "remote: namespace cleared");
        Ok(())
    }

    // == Print ==
    /// Renders `key:value` pairs front to back, joined by `", "`.
    ///
    /// Keys whose value has expired are dropped from the order list.
    pub async fn print(&self) -> Result<String> {
        let keys = self.backend.range_all(&self.order_key).await?;
        let mut items = Vec::with_capacity(keys.len());

        for key in keys {
            match self.backend.get(&self.value_key(&key)).await? {
                Some(value) => items.push(format!("{}:{}", key, value)),
                None => self.backend.remove_all(&self.order_key, &key).await?,
            }
        }

        Ok(items.join(", "))
    }

    /// Length of the order list (may still count natively expired keys).
    pub async fn len(&self) -> Result<usize> {
        self.backend.list_len(&self.order_key).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
