//! Cache module for storing weather lookups in a TTL key-value store
//!
//! This module provides the [`CacheStore`] trait the lookup orchestrator
//! reads through, with two implementations:
//! - [`RedisStore`] - Production Redis-backed store, expiry enforced by the
//!   backend via `SET ... EX`
//! - [`MemoryStore`] - In-process store with per-entry expiry timestamps,
//!   used in tests and when running without a Redis instance

mod memory;
mod redis_cache;
mod store;

pub use memory::MemoryStore;
pub use redis_cache::RedisStore;
pub use store::{CacheError, CacheStore};
