//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::DualStats;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operations (DELETE /del/:key, DELETE /del_all)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    /// The deleted key, absent for delete-all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key: Some(key),
        }
    }

    pub fn all() -> Self {
        Self {
            message: "All keys deleted from both backends".to_string(),
            key: None,
        }
    }
}

/// Response body for the print endpoints (GET /print/local, GET /print/remote)
#[derive(Debug, Clone, Serialize)]
pub struct PrintResponse {
    /// Which backend was rendered ("local" or "remote")
    pub backend: String,
    /// `key:value` pairs, most recent first, joined by ", "
    pub contents: String,
}

impl PrintResponse {
    pub fn new(backend: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            contents: contents.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Entries currently held by the local store
    pub local_entries: usize,
    /// Keys currently in the remote order list
    pub remote_entries: usize,
    /// Local hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<DualStats> for StatsResponse {
    fn from(stats: DualStats) -> Self {
        Self {
            hits: stats.local.hits,
            misses: stats.local.misses,
            evictions: stats.local.evictions,
            expirations: stats.local.expirations,
            local_entries: stats.local.total_entries,
            remote_entries: stats.remote_entries,
            hit_rate: stats.local.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
