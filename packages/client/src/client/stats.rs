//! Client statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// HTTP client statistics
#[derive(Debug)]
pub struct ClientStats {
    /// Total number of operations run
    pub requests_total: AtomicU64,
    /// Operations that reached the executor
    pub requests_sent: AtomicU64,
    /// Operations that ended in an error instead of a response
    pub requests_failed: AtomicU64,
    /// GETs answered from a fresh cache entry
    pub cache_hits: AtomicU64,
    /// GETs with nothing usable in the cache
    pub cache_misses: AtomicU64,
    /// Conditional requests issued for stale entries
    pub revalidations: AtomicU64,
    /// Revalidations answered with `304 Not Modified`
    pub not_modified: AtomicU64,
    /// Client creation time
    pub created_at: Instant,
}

impl Default for ClientStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientStats {
    /// Create new client statistics
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            requests_sent: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            revalidations: AtomicU64::new(0),
            not_modified: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sent(&self) {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_revalidation(&self) {
        self.revalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_modified(&self) {
        self.not_modified.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of cacheable lookups answered without a full fetch
    pub fn cache_hit_ratio(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed) + self.not_modified.load(Ordering::Relaxed);
        let total = self.cache_hits.load(Ordering::Relaxed)
            + self.cache_misses.load(Ordering::Relaxed)
            + self.revalidations.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            // Precision loss acceptable for ratio statistics
            #[allow(clippy::cast_precision_loss)]
            {
                hits as f64 / total as f64
            }
        }
    }

    /// Get client age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Create a snapshot of current statistics
    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            revalidations: self.revalidations.load(Ordering::Relaxed),
            not_modified: self.not_modified.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ClientStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientStatsSnapshot {
    pub requests_total: u64,
    pub requests_sent: u64,
    pub requests_failed: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub revalidations: u64,
    pub not_modified: u64,
}
