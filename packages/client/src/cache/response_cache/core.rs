//! Core ResponseCache structure and initialization
//!
//! Provides the main ResponseCache struct: the locked entry index, its
//! configuration and the access clock used for recency ordering.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::super::{cache_config::CacheConfig, cache_stats::CacheStats};
use super::index::CacheIndex;

/// Bounded HTTP response cache
pub struct ResponseCache {
    /// Entries and their orderings
    pub(super) index: RwLock<CacheIndex>,
    /// Configuration
    pub(super) config: CacheConfig,
    /// Monotonic access clock; every stamp it hands out is unique
    pub(super) clock: AtomicU64,
    /// Cache statistics
    pub(super) stats: CacheStats,
}

impl ResponseCache {
    /// Create new response cache with configuration
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        tracing::debug!(
            target: "restful::cache",
            max_cache_size = config.max_cache_size,
            default_ttl = ?config.default_ttl,
            "Response cache created"
        );

        Self {
            index: RwLock::new(CacheIndex::default()),
            config,
            clock: AtomicU64::new(1),
            stats: CacheStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get cache statistics
    #[inline]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Accounted size of all live entries
    pub fn total_size(&self) -> u64 {
        self.index.read().total_size()
    }

    /// Get current cache size information: entries, accounted bytes, percent of ceiling
    #[allow(clippy::cast_precision_loss)]
    pub fn size_info(&self) -> (usize, u64, f64) {
        let index = self.index.read();
        let used = index.total_size();
        let pct = if self.config.max_cache_size == 0 {
            0.0
        } else {
            (used as f64 / self.config.max_cache_size as f64) * 100.0
        };
        (index.len(), used, pct)
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        let mut index = self.index.write();
        let dropped = index.len();
        index.clear();
        tracing::debug!(target: "restful::cache", dropped, "Response cache cleared");
    }

    #[inline]
    pub(super) fn next_stamp(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index.read();
        f.debug_struct("ResponseCache")
            .field("entries", &index.len())
            .field("total_size", &index.total_size())
            .field("max_cache_size", &self.config.max_cache_size)
            .finish()
    }
}
