//! Bounded HTTP response caching with TTL expiry and conditional revalidation
//!
//! This module provides the response cache used by the client:
//! - Reader-writer locked entry index with recency and expiry orderings
//! - Hard ceiling on the accounted size of all entries
//! - TTL freshness derived from `Cache-Control`, `Expires` or a default
//! - `ETag` / `Last-Modified` validators for conditional requests
//! - Eviction by soonest expiry, then least recent use

pub mod cache_config;
pub mod cache_entry;
pub mod cache_key;
pub mod cache_stats;
pub mod freshness;
pub mod http_date;
pub mod response_cache;

pub use cache_config::{CacheConfig, DEFAULT_MAX_CACHE_SIZE};
pub use cache_entry::{CacheEntry, SizeAccountingError, estimate_size};
pub use cache_key::CacheKey;
pub use cache_stats::{CacheStats, CacheStatsSnapshot};
pub use freshness::{Freshness, Validators, classify};
pub use http_date::{HttpDateParseError, httpdate};
pub use response_cache::{CacheLookup, ResponseCache, StaleEntry};
