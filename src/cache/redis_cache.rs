//! Redis-backed cache store
//!
//! Entry expiration is delegated to Redis itself: values are written with
//! `SET key value EX seconds`, so expired keys simply stop existing and no
//! sweeper is needed on our side.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::store::{CacheError, CacheStore};

/// Cache store backed by a Redis instance
///
/// Wraps a [`ConnectionManager`], which multiplexes one long-lived
/// connection and reconnects on failure. Connect once at startup and share
/// the store across lookups.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to the Redis instance at `url`
    ///
    /// # Arguments
    /// * `url` - Redis connection URL, e.g. `redis://127.0.0.1:6379`
    ///
    /// # Returns
    /// * `Ok(RedisStore)` once the initial connection is established
    /// * `Err(CacheError)` if the URL is invalid or the server is unreachable
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        // SETEX rejects a zero expiry, so clamp to at least one second.
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, seconds).await?;

        Ok(())
    }
}
