//! City Weather Lookup Library
//!
//! The cache-aside core of a city weather service: a lookup either hits a
//! Redis-backed cache or fetches from the Visual Crossing API, normalizes
//! the response defensively, and writes the result back under a fixed TTL.
//!
//! The library surface is [`WeatherService::lookup`]; the binary in this
//! crate and the integration tests are its two callers.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod lookup;

pub use cache::{CacheError, CacheStore, MemoryStore, RedisStore};
pub use config::Config;
pub use data::WeatherRecord;
pub use lookup::{LookupError, WeatherService};
