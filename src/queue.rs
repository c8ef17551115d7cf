//! Redis-backed log queue client
//!
//! The queue is a list at a fixed key. Scans read the full range without
//! consuming it, so repeated requests against an unchanged queue observe the
//! same snapshot. Nothing here coordinates concurrent readers.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisResult};
use tracing::{debug, info};

/// Client for the buffered log record list.
#[derive(Clone)]
pub struct LogQueue {
    conn: ConnectionManager,
    key: String,
}

impl LogQueue {
    /// Connect to the queue and hold a multiplexed connection for the
    /// process lifetime.
    pub async fn connect(url: &str, key: &str) -> Result<Self> {
        let client = Client::open(url).with_context(|| format!("invalid queue url {url}"))?;
        let conn = client
            .get_connection_manager()
            .await
            .with_context(|| format!("failed to connect to log queue at {url}"))?;

        info!(url = %url, key = %key, "connected to log queue");

        Ok(Self {
            conn,
            key: key.to_string(),
        })
    }

    /// Read the entire buffered range, non-destructively.
    ///
    /// No pagination, no bound, no acknowledgment: every scan sees whatever
    /// is currently buffered.
    pub async fn fetch_all(&self) -> RedisResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let entries: Vec<String> = conn.lrange(&self.key, 0, -1).await?;

        debug!(key = %self.key, entries = entries.len(), "fetched queue snapshot");

        Ok(entries)
    }

    /// Prepend a serialized record to the queue.
    pub async fn push(&self, payload: String) -> RedisResult<()> {
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(&self.key, payload).await?;

        debug!(key = %self.key, "pushed log record");

        Ok(())
    }

    /// Current queue depth.
    pub async fn len(&self) -> RedisResult<usize> {
        let mut conn = self.conn.clone();
        conn.llen(&self.key).await
    }

    /// Get the queue key.
    pub fn key(&self) -> &str {
        &self.key
    }
}
