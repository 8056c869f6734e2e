//! Cache store trait and error type
//!
//! The trait is the seam between the lookup orchestrator and whatever
//! key-value backend holds cached records. Values are opaque strings here;
//! serialization of weather records is the orchestrator's business.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the cache backend
#[derive(Debug, Error)]
pub enum CacheError {
    /// Underlying Redis command or connection failure
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// Backend could not be reached or refused the operation
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// A key-value store with per-entry expiration
///
/// Implementations must be safe for concurrent access; the same store is
/// shared by every in-flight lookup. An expired entry is indistinguishable
/// from an absent one: `get` never returns stale data.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the serialized value stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(value))` if a live entry exists
    /// * `Ok(None)` if the key is absent or its entry has expired
    /// * `Err(CacheError)` if the backend could not be queried
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous entry
    ///
    /// The new entry expires `ttl` from now; overwriting resets the clock.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

#[async_trait]
impl<S: CacheStore + ?Sized> CacheStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.as_ref().set(key, value, ttl).await
    }
}
