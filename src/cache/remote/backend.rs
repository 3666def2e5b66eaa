//! Remote primitive consumed by the remote store: a key-value space with
//! native per-key expiry plus ordered lists.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Ordered-list + key-value service the remote store is layered on.
///
/// Every call may fail with [`CacheError::Remote`](crate::error::CacheError::Remote);
/// implementations never retry.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value`; `ttl_seconds` of `None` means no expiration.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn push_front(&self, list: &str, value: &str) -> Result<()>;

    /// Removes every occurrence of `value` from `list`.
    async fn remove_all(&self, list: &str, value: &str) -> Result<()>;

    /// Whole list, front to back.
    async fn range_all(&self, list: &str) -> Result<Vec<String>>;

    async fn list_len(&self, list: &str) -> Result<usize>;

    async fn pop_back(&self, list: &str) -> Result<Option<String>>;

    /// Drops every key of the remote instance, not only ours.
    async fn flush_all(&self) -> Result<()>;
}

pub type BackendHandle = Arc<dyn RemoteBackend + 'static>;
