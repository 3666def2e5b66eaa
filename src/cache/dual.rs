//! Dual Cache Coordinator
//!
//! Fans every operation out to the local and remote stores on separate tasks
//! and joins both. A read only counts as a hit when both stores return the
//! same value; any divergence reads as a miss.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::remote::validate_ttl;
use crate::cache::{CacheStats, LocalStore, RemoteStore};
use crate::error::{CacheError, Result};

// == Dual Stats ==
/// Snapshot of both backends.
#[derive(Debug, Clone, Serialize)]
pub struct DualStats {
    pub local: CacheStats,
    /// Length of the remote order list
    pub remote_entries: usize,
}

// == Dual Cache ==
/// Stateless coordinator over the two stores. Holds no lock of its own.
#[derive(Clone)]
pub struct DualCache {
    local: Arc<LocalStore>,
    remote: Arc<RemoteStore>,
}

/// Runs both futures on their own tasks and waits for both.
async fn fan_out<L, R>(local: L, remote: R) -> Result<(L::Output, R::Output)>
where
    L: Future + Send + 'static,
    L::Output: Send + 'static,
    R: Future + Send + 'static,
    R::Output: Send + 'static,
{
    let local = tokio::spawn(local);
    let remote = tokio::spawn(remote);
    let (local, remote) = tokio::join!(local, remote);
    Ok((local?, remote?))
}

impl DualCache {
    // == Constructor ==
    pub fn new(local: Arc<LocalStore>, remote: Arc<RemoteStore>) -> Self {
        Self { local, remote }
    }

    /// Coordinator over a fresh local store and an in-process remote backend.
    pub fn in_memory(namespace: impl Into<String>) -> Self {
        Self::new(
            Arc::new(LocalStore::new()),
            Arc::new(RemoteStore::in_memory(namespace)),
        )
    }

    pub fn local(&self) -> &Arc<LocalStore> {
        &self.local
    }

    pub fn remote(&self) -> &Arc<RemoteStore> {
        &self.remote
    }

    // == Set ==
    /// Writes to both stores and returns once both are done.
    ///
    /// Capacity and TTL are checked up front so a rejected call mutates
    /// neither store. Past that point there is no rollback: a remote failure
    /// leaves the local write in place.
    pub async fn set(&self, key: &str, value: &str, capacity: usize, ttl: i64) -> Result<()> {
        if capacity == 0 {
            return Err(CacheError::InvalidRequest(
                "capacity must be at least 1".to_string(),
            ));
        }
        validate_ttl(ttl)?;

        let (local, remote) = (Arc::clone(&self.local), Arc::clone(&self.remote));
        let (local_key, local_value) = (key.to_string(), value.to_string());
        let (remote_key, remote_value) = (key.to_string(), value.to_string());

        let ((), remote_result) = fan_out(
            async move { local.set(&local_key, &local_value, capacity, ttl).await },
            async move { remote.set(&remote_key, &remote_value, capacity, ttl).await },
        )
        .await?;
        remote_result
    }

    // == Get ==
    /// Returns the value only when both stores agree on it.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let (local, remote) = (Arc::clone(&self.local), Arc::clone(&self.remote));
        let (local_key, remote_key) = (key.to_string(), key.to_string());

        let (local_value, remote_value) = fan_out(
            async move { local.get(&local_key).await },
            async move { remote.get(&remote_key).await },
        )
        .await?;
        let remote_value = remote_value?;

        if local_value == remote_value {
            Ok(local_value)
        } else {
            debug!(
                key,
                local = ?local_value,
                remote = ?remote_value,
                "backends diverged, treating as miss"
            );
            Ok(None)
        }
    }

    // == Delete ==
    pub async fn del(&self, key: &str) -> Result<()> {
        let (local, remote) = (Arc::clone(&self.local), Arc::clone(&self.remote));
        let (local_key, remote_key) = (key.to_string(), key.to_string());

        let ((), remote_result) = fan_out(
            async move { local.del(&local_key).await },
            async move { remote.del(&remote_key).await },
        )
        .await?;
        remote_result
    }

    // == Delete All ==
    pub async fn del_all(&self) -> Result<()> {
        let (local, remote) = (Arc::clone(&self.local), Arc::clone(&self.remote));

        let ((), remote_result) = fan_out(
            async move { local.del_all().await },
            async move { remote.del_all().await },
        )
        .await?;
        remote_result
    }

    // == Print ==
    pub async fn print_local(&self) -> String {
        self.local.print().await
    }

    pub async fn print_remote(&self) -> Result<String> {
        self.remote.print().await
    }

    // == Stats ==
    pub async fn stats(&self) -> Result<DualStats> {
        Ok(DualStats {
            local: self.local.stats().await,
            remote_entries: self.remote.len().await?,
        })
    }
}
