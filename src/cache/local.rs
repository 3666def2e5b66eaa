//! Local Store Module
//!
//! In-process LRU cache combining HashMap storage with LRU tracking and TTL
//! expiration. Every operation runs as one critical section on a tokio mutex,
//! the background sweep included.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{entry::current_timestamp_ms, CacheEntry, CacheStats, LruTracker};

// == Local Store ==
/// Process-local LRU store.
#[derive(Debug, Default)]
pub struct LocalStore {
    inner: Mutex<LocalInner>,
}

#[derive(Debug, Default)]
struct LocalInner {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
}

impl LocalInner {
    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    fn sync_len(&mut self) {
        let len = self.entries.len();
        self.stats.set_total_entries(len);
    }
}

impl LocalStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Inserts or updates a key.
    ///
    /// Updating an existing key refreshes its value and expiration and moves
    /// it to the front without any capacity check. A new key arriving while
    /// the store holds `capacity` or more entries evicts from the back first.
    ///
    /// # Arguments
    /// * `ttl_seconds` - Lifetime in seconds; zero or negative means no expiration
    pub async fn set(&self, key: &str, value: &str, capacity: usize, ttl_seconds: i64) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if let Some(entry) = inner.entries.get_mut(key) {
            entry.refresh(value.to_string(), ttl_seconds);
            inner.lru.touch(key);
            return;
        }

        while inner.entries.len() >= capacity {
            let Some(evicted) = inner.lru.evict_oldest() else {
                break;
            };
            inner.entries.remove(&evicted);
            inner.stats.record_eviction();
            debug!(key = %evicted, "local: evicted least recently used entry");
        }

        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl_seconds));
        inner.lru.touch(key);
        inner.sync_len();
    }

    // == Get ==
    /// Returns the value if present and unexpired, moving it to the front.
    /// An expired entry found here is dropped.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.lock().await;

        let Some(expired) = inner.entries.get(key).map(CacheEntry::is_expired) else {
            inner.stats.record_miss();
            return None;
        };

        if expired {
            inner.remove(key);
            inner.stats.record_expirations(1);
            inner.stats.record_miss();
            inner.sync_len();
            return None;
        }

        inner.lru.touch(key);
        inner.stats.record_hit();
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes a key; absent keys are a no-op.
    pub async fn del(&self, key: &str) {
        let mut inner = self.inner.lock().await;
        if inner.remove(key) {
            inner.sync_len();
        }
    }

    // == Delete All ==
    pub async fn del_all(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.lru.clear();
        inner.sync_len();
    }

    // == Print ==
    /// Renders `key:value` pairs front to back, joined by `", "`.
    ///
    /// Expired entries met during the scan are removed and left out.
    pub async fn print(&self) -> String {
        let mut inner = self.inner.lock().await;
        let now = current_timestamp_ms();

        let mut items = Vec::with_capacity(inner.lru.len());
        let mut expired = Vec::new();
        for key in inner.lru.iter() {
            match inner.entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => {
                    items.push(format!("{}:{}", key, entry.value));
                }
                _ => expired.push(key.clone()),
            }
        }

        for key in &expired {
            inner.remove(key);
        }
        inner.stats.record_expirations(expired.len());
        inner.sync_len();

        items.join(", ")
    }

    // == Sweep Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub async fn sweep_expired(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let now = current_timestamp_ms();

        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        inner.stats.record_expirations(expired.len());
        inner.sync_len();
        expired.len()
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }
}
