//! Cache-aside weather lookup
//!
//! The orchestrator that decides whether a request is satisfied from the
//! cache or from the upstream provider. Flow per lookup: validate the city,
//! read the cache, on a miss fetch and normalize the forecast, write the
//! result back under a fixed TTL, return it.
//!
//! Cache trouble never sinks a lookup: unreadable backends and corrupt
//! entries degrade to a miss, and write failures are logged and swallowed.
//! Only validation, upstream, and normalization failures reach the caller.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::cache::{CacheError, CacheStore};
use crate::data::normalize::{normalize, NormalizeError};
use crate::data::upstream::{UpstreamClient, UpstreamError};
use crate::data::WeatherRecord;

/// Errors that can occur during a weather lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// Caller supplied an empty (or all-whitespace) city
    #[error("city must not be empty")]
    EmptyCity,

    /// Upstream provider could not be fetched
    #[error("weather fetch failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// Upstream answered, but the payload lacked the required shape
    #[error("weather response invalid: {0}")]
    Normalize(#[from] NormalizeError),

    /// Cache backend failure surfaced to the caller
    ///
    /// `lookup` itself degrades cache faults instead of returning this;
    /// the variant exists so callers composing this crate (store setup,
    /// warm-up jobs) have one error type to propagate into.
    #[error("cache unavailable: {0}")]
    Cache(#[from] CacheError),
}

/// Cache-aside lookup service
///
/// Holds the process-wide collaborators: one cache store, one upstream
/// client, and the TTL applied to every cache write. Construct it once at
/// startup and share it; `lookup` takes `&self` and may be called
/// concurrently. Two concurrent misses for the same city will both fetch
/// upstream and both write the cache; duplicate writes of the same value
/// are harmless here, so there is no per-key in-flight lock.
pub struct WeatherService<S> {
    store: S,
    upstream: UpstreamClient,
    cache_ttl: Duration,
}

impl<S: CacheStore> WeatherService<S> {
    /// Creates a new WeatherService
    ///
    /// # Arguments
    /// * `store` - Cache store shared across lookups
    /// * `upstream` - Upstream forecast client
    /// * `cache_ttl` - Freshness window applied to every cache write
    pub fn new(store: S, upstream: UpstreamClient, cache_ttl: Duration) -> Self {
        Self {
            store,
            upstream,
            cache_ttl,
        }
    }

    /// Looks up current weather for a city
    ///
    /// A cache hit is returned as-is without refreshing its TTL; only
    /// writes reset the clock. On a miss the upstream forecast is fetched,
    /// normalized, cached, and returned. A payload that fails normalization
    /// is never written to the cache.
    ///
    /// # Arguments
    /// * `city` - City name; also the cache key, used exactly as given
    ///   (no case or whitespace normalization; callers must supply
    ///   consistent casing for hits to occur)
    ///
    /// # Returns
    /// * `Ok(WeatherRecord)` from cache or upstream
    /// * `Err(LookupError)` if the city is empty, the fetch fails, or the
    ///   payload cannot be normalized
    #[instrument(skip(self), level = "info")]
    pub async fn lookup(&self, city: &str) -> Result<WeatherRecord, LookupError> {
        if city.trim().is_empty() {
            return Err(LookupError::EmptyCity);
        }

        if let Some(record) = self.read_cached(city).await {
            return Ok(record);
        }

        let payload = self.upstream.fetch(city).await?;
        let record = normalize(city, &payload)?;

        self.write_cached(city, &record).await;

        Ok(record)
    }

    /// Reads the cached record for a city; every failure mode is a miss
    async fn read_cached(&self, city: &str) -> Option<WeatherRecord> {
        let raw = match self.store.get(city).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(city, "cache miss");
                return None;
            }
            Err(err) => {
                warn!(city, error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<WeatherRecord>(&raw) {
            Ok(record) => {
                debug!(city, "cache hit");
                Some(record)
            }
            Err(err) => {
                warn!(city, error = %err, "corrupt cache entry, refetching");
                None
            }
        }
    }

    /// Writes a freshly fetched record to the cache, best-effort
    async fn write_cached(&self, city: &str, record: &WeatherRecord) {
        let serialized = match serde_json::to_string(record) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(city, error = %err, "failed to serialize record for cache");
                return;
            }
        };

        if let Err(err) = self.store.set(city, &serialized, self.cache_ttl).await {
            warn!(city, error = %err, "cache write failed");
        }
    }
}
