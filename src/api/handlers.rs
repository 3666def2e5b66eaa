//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Each handler is a
//! thin translation onto one [`DualCache`] call.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{DualCache, LocalStore, RedisBackend, RemoteStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, PrintResponse, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Coordinator over both backends
    pub cache: DualCache,
    /// Capacity used when a SET request does not carry one
    pub capacity: usize,
}

impl AppState {
    pub fn new(cache: DualCache, capacity: usize) -> Self {
        Self { cache, capacity }
    }

    /// Connects to Redis and builds both stores from configuration.
    ///
    /// When `remote_reset_on_start` is set, the remote namespace is cleared so
    /// both backends start out empty.
    pub async fn connect(config: &Config) -> Result<Self> {
        let backend = RedisBackend::connect(&config.redis_url).await?;
        let remote = RemoteStore::new(Arc::new(backend), config.remote_namespace.clone())
            .with_flush_all(config.remote_flush_all);

        if config.remote_reset_on_start {
            remote.reset().await?;
            info!("Remote namespace '{}' reset", remote.namespace());
        }

        let cache = DualCache::new(Arc::new(LocalStore::new()), Arc::new(remote));
        Ok(Self::new(cache, config.capacity))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in both backends.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let capacity = req.capacity.unwrap_or(state.capacity);
    state
        .cache
        .set(&req.key, &req.value, capacity, req.ttl)
        .await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Answers 404 unless both backends hold the same value.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deleting an absent key still succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.del(&key).await?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /del_all
pub async fn delete_all_handler(State(state): State<AppState>) -> Result<Json<DeleteResponse>> {
    state.cache.del_all().await?;
    Ok(Json(DeleteResponse::all()))
}

/// Handler for GET /print/local
pub async fn print_local_handler(State(state): State<AppState>) -> Json<PrintResponse> {
    Json(PrintResponse::new("local", state.cache.print_local().await))
}

/// Handler for GET /print/remote
pub async fn print_remote_handler(State(state): State<AppState>) -> Result<Json<PrintResponse>> {
    let contents = state.cache.print_remote().await?;
    Ok(Json(PrintResponse::new("remote", contents)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.cache.stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
