//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity applied to both backends when a request does not carry one
    pub capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Local store sweep interval in seconds
    pub cleanup_interval: u64,
    /// Connection URL of the Redis instance backing the remote store
    pub redis_url: String,
    /// Prefix under which all remote keys live
    pub remote_namespace: String,
    /// Flush the whole Redis instance on delete-all instead of the namespace
    pub remote_flush_all: bool,
    /// Clear the remote namespace at startup so both backends start empty
    pub remote_reset_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Entries per backend (default: 100)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379)
    /// - `REMOTE_NAMESPACE` - Remote key prefix (default: dual_cache)
    /// - `REMOTE_FLUSH_ALL` - Flush the entire instance on delete-all (default: false)
    /// - `REMOTE_RESET_ON_START` - Clear the namespace on startup (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            remote_namespace: env::var("REMOTE_NAMESPACE")
                .ok()
                .filter(|ns| !ns.is_empty())
                .unwrap_or(defaults.remote_namespace),
            remote_flush_all: parse_var("REMOTE_FLUSH_ALL").unwrap_or(defaults.remote_flush_all),
            remote_reset_on_start: parse_var("REMOTE_RESET_ON_START")
                .unwrap_or(defaults.remote_reset_on_start),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 100,
            server_port: 3000,
            cleanup_interval: 1,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            remote_namespace: "dual_cache".to_string(),
            remote_flush_all: false,
            remote_reset_on_start: true,
        }
    }
}
