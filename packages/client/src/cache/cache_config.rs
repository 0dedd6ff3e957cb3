//! Cache configuration and preset policies
//!
//! Provides `CacheConfig`, the explicit replacement for process-wide cache
//! tunables. Every `ResponseCache` owns its own copy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ceiling for the accounted size of all cached entries (100 MiB)
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 100 * 1024 * 1024;

/// Cache configuration and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Hard ceiling on the total accounted size of live entries, enforced on every insert
    pub max_cache_size: u64,
    /// TTL for responses that carry no explicit freshness information.
    /// `None` stores such responses only when they carry validators.
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            default_ttl: None,
        }
    }
}

impl CacheConfig {
    /// Create configuration with a custom size ceiling
    #[must_use]
    pub fn with_max_cache_size(mut self, bytes: u64) -> Self {
        self.max_cache_size = bytes;
        self
    }

    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Create aggressive caching configuration
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            max_cache_size: 500 * 1024 * 1024,
            default_ttl: Some(Duration::from_secs(3600)),
        }
    }

    /// Create conservative caching configuration
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            max_cache_size: 20 * 1024 * 1024,
            default_ttl: None,
        }
    }
}
