//! Redis implementation of [`RemoteBackend`].

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Cmd, FromRedisValue};
use tracing::info;

use super::RemoteBackend;
use crate::error::Result;

/// Talks to Redis through a reconnecting, multiplexed connection manager.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Opens a connection to the instance at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }

    async fn query<T: FromRedisValue>(&self, cmd: Cmd) -> Result<T> {
        let mut conn = self.conn.clone();
        let value: T = cmd.query_async(&mut conn).await?;
        Ok(value)
    }
}

#[async_trait]
impl RemoteBackend for RedisBackend {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut cmd = redis::cmd("EXISTS");
        cmd.arg(key);
        let count: u64 = self.query(cmd).await?;
        Ok(count > 0)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.query(cmd).await
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(secs) = ttl_seconds {
            cmd.arg("EX").arg(secs);
        }
        self.query(cmd).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(key);
        self.query(cmd).await
    }

    async fn push_front(&self, list: &str, value: &str) -> Result<()> {
        let mut cmd = redis::cmd("LPUSH");
        cmd.arg(list).arg(value);
        self.query(cmd).await
    }

    async fn remove_all(&self, list: &str, value: &str) -> Result<()> {
        // count 0 removes every occurrence
        let mut cmd = redis::cmd("LREM");
        cmd.arg(list).arg(0).arg(value);
        self.query(cmd).await
    }

    async fn range_all(&self, list: &str) -> Result<Vec<String>> {
        let mut cmd = redis::cmd("LRANGE");
        cmd.arg(list).arg(0).arg(-1);
        self.query(cmd).await
    }

    async fn list_len(&self, list: &str) -> Result<usize> {
        let mut cmd = redis::cmd("LLEN");
        cmd.arg(list);
        self.query(cmd).await
    }

    async fn pop_back(&self, list: &str) -> Result<Option<String>> {
        let mut cmd = redis::cmd("RPOP");
        cmd.arg(list);
        self.query(cmd).await
    }

    async fn flush_all(&self) -> Result<()> {
        self.query(redis::cmd("FLUSHALL")).await
    }
}
