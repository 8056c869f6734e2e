//! Environment-driven configuration
//!
//! Everything the lookup core needs from the outside world is resolved once
//! at startup: the upstream API key (required), the Redis URL, and the cache
//! TTL. A missing API key is a fatal startup error, never a per-request one.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the Visual Crossing API key
pub const API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Environment variable overriding the Redis connection URL
pub const REDIS_URL_VAR: &str = "REDIS_URL";

/// Environment variable overriding the cache TTL in seconds
pub const CACHE_TTL_VAR: &str = "CACHE_TTL_SECS";

/// Redis URL used when none is configured
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Freshness window for cached records when none is configured.
/// Ten minutes balances upstream rate limits against how quickly weather
/// actually changes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Errors that can occur when resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API key variable is unset or blank
    #[error("WEATHER_API_KEY must be set to a non-empty Visual Crossing API key")]
    MissingApiKey,

    /// The TTL override is not a positive number of seconds
    #[error("CACHE_TTL_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTtl(String),
}

/// Process-wide configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Visual Crossing API key
    pub api_key: String,
    /// Redis connection URL
    pub redis_url: String,
    /// How long cached records stay fresh
    pub cache_ttl: Duration,
}

impl Config {
    /// Resolves configuration from the environment
    ///
    /// # Returns
    /// * `Ok(Config)` with defaults applied for the optional values
    /// * `Err(ConfigError)` if the API key is missing or the TTL override
    ///   does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let redis_url =
            env::var(REDIS_URL_VAR).unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());

        let cache_ttl = match env::var(CACHE_TTL_VAR) {
            Ok(raw) => parse_ttl(&raw)?,
            Err(_) => DEFAULT_CACHE_TTL,
        };

        Ok(Self {
            api_key,
            redis_url,
            cache_ttl,
        })
    }
}

/// Parses a TTL override into a duration; zero is rejected
fn parse_ttl(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|seconds| *seconds > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidTtl(raw.to_string()))
}
