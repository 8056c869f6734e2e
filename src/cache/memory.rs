//! In-process cache store with per-entry expiry
//!
//! Serves the same contract as the Redis store without any external
//! process, which makes it the store of choice for tests and for running
//! the CLI against nothing but the upstream API.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::store::{CacheError, CacheStore};

/// A stored value together with its expiry timestamp
#[derive(Debug, Clone)]
struct MemoryEntry {
    /// The cached serialized value
    value: String,
    /// When the entry stops being served
    expires_at: DateTime<Utc>,
}

/// Cache store backed by an in-process map
///
/// Expired entries are evicted lazily when read. The map is guarded by a
/// mutex, so the store is safe to share across concurrent lookups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    /// Creates an empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, including not-yet-evicted expired ones
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                // Expired: evict so the map does not grow unbounded.
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: Utc::now() + chrono::Duration::milliseconds(ttl.as_millis() as i64),
        };

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), entry);

        Ok(())
    }
}
