//! In-process [`RemoteBackend`] with native expiry and failure injection.
//!
//! Mirrors the Redis commands the remote store relies on, so the full stack
//! can run (and be tested) without a Redis instance.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::RemoteBackend;
use crate::error::{CacheError, Result};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Debug)]
enum Slot {
    Str {
        value: String,
        deadline: Option<Instant>,
    },
    List(VecDeque<String>),
}

/// One keyspace shared by strings and lists, as in Redis.
#[derive(Debug, Default)]
struct MemoryState {
    slots: HashMap<String, Slot>,
}

impl MemoryState {
    /// Drops `key` if its deadline has passed, then reports what is left.
    fn live(&mut self, key: &str) -> Option<&mut Slot> {
        let expired = matches!(
            self.slots.get(key),
            Some(Slot::Str { deadline: Some(deadline), .. }) if Instant::now() >= *deadline
        );
        if expired {
            self.slots.remove(key);
        }
        self.slots.get_mut(key)
    }

    fn string(&mut self, key: &str) -> Result<Option<&String>> {
        match self.live(key) {
            None => Ok(None),
            Some(Slot::Str { value, .. }) => Ok(Some(&*value)),
            Some(Slot::List(_)) => Err(wrong_type()),
        }
    }

    fn list(&mut self, key: &str) -> Result<Option<&mut VecDeque<String>>> {
        match self.live(key) {
            None => Ok(None),
            Some(Slot::List(items)) => Ok(Some(items)),
            Some(Slot::Str { .. }) => Err(wrong_type()),
        }
    }

    /// Lists vanish once empty, like Redis.
    fn drop_if_empty(&mut self, key: &str) {
        if matches!(self.slots.get(key), Some(Slot::List(items)) if items.is_empty()) {
            self.slots.remove(key);
        }
    }
}

fn wrong_type() -> CacheError {
    CacheError::Remote(WRONG_TYPE.to_string())
}

/// Process-local stand-in for the Redis primitive.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with [`CacheError::Remote`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Remote("connection refused".to_string()));
        }
        Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl RemoteBackend for MemoryBackend {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.state()?.live(key).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state()?.string(key)?.cloned())
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()> {
        // A deadline past what Instant can represent never fires
        let deadline =
            ttl_seconds.and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs)));
        self.state()?.slots.insert(
            key.to_string(),
            Slot::Str {
                value: value.to_string(),
                deadline,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.state()?.slots.remove(key);
        Ok(())
    }

    async fn push_front(&self, list: &str, value: &str) -> Result<()> {
        let mut state = self.state()?;
        match state.list(list)? {
            Some(items) => items.push_front(value.to_string()),
            None => {
                state
                    .slots
                    .insert(list.to_string(), Slot::List(VecDeque::from([value.to_string()])));
            }
        }
        Ok(())
    }

    async fn remove_all(&self, list: &str, value: &str) -> Result<()> {
        let mut state = self.state()?;
        if let Some(items) = state.list(list)? {
            items.retain(|item| item != value);
        }
        state.drop_if_empty(list);
        Ok(())
    }

    async fn range_all(&self, list: &str) -> Result<Vec<String>> {
        Ok(self
            .state()?
            .list(list)?
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_len(&self, list: &str) -> Result<usize> {
        Ok(self.state()?.list(list)?.map_or(0, |items| items.len()))
    }

    async fn pop_back(&self, list: &str) -> Result<Option<String>> {
        let mut state = self.state()?;
        let popped = state.list(list)?.and_then(VecDeque::pop_back);
        state.drop_if_empty(list);
        Ok(popped)
    }

    async fn flush_all(&self) -> Result<()> {
        self.state()?.slots.clear();
        Ok(())
    }
}
