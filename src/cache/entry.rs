//! Cache Entry Module
//!
//! Defines the structure for individual local cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A value held by the local store together with its optional deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Lifetime in seconds; zero or negative means no expiration
    pub fn new(value: String, ttl_seconds: i64) -> Self {
        Self {
            value,
            expires_at: deadline_from_ttl(ttl_seconds),
        }
    }

    // == Refresh ==
    /// Replaces the value and restarts the expiration clock.
    pub fn refresh(&mut self, value: String, ttl_seconds: i64) {
        self.value = value;
        self.expires_at = deadline_from_ttl(ttl_seconds);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is still live at exactly `expires_at` and expires strictly after it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms > expires,
            None => false,
        }
    }
}

/// Saturates at `u64::MAX`, which never expires in practice.
fn deadline_from_ttl(ttl_seconds: i64) -> Option<u64> {
    if ttl_seconds <= 0 {
        return None;
    }
    let ttl_ms = (ttl_seconds as u64).checked_mul(1000).unwrap_or(u64::MAX);
    Some(current_timestamp_ms().saturating_add(ttl_ms))
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
