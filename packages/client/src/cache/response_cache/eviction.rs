//! Cache eviction and cleanup operations
//!
//! Size-driven eviction for inserts and explicit removal of expired entries.

use std::time::Instant;

use super::core::ResponseCache;
use super::index::CacheIndex;
use crate::cache::CacheKey;

impl ResponseCache {
    /// Evict entries until `incoming` more bytes fit under the ceiling.
    /// Returns the number of entries actually evicted.
    pub(super) fn evict_until_fits(&self, index: &mut CacheIndex, incoming: u64) -> usize {
        let mut evicted = 0;

        while index.total_size().saturating_add(incoming) > self.config.max_cache_size {
            let Some(victim) = index.victim() else { break };

            if let Some(entry) = index.remove(&victim) {
                tracing::trace!(
                    target: "restful::cache",
                    key = %victim,
                    size = entry.size(),
                    "Evicted entry"
                );
                self.stats.record_eviction();
                evicted += 1;
            }
        }

        evicted
    }

    /// Unlink expired entries that cannot be revalidated.
    ///
    /// Walks only the expired prefix of the expiry index. Expired entries
    /// carrying validators stay since a conditional request can still bring
    /// them back.
    pub(super) fn drop_expired(&self, index: &mut CacheIndex, now: Instant) -> usize {
        let mut dropped = 0;
        for key in index.expired_keys(now) {
            let revalidatable = index.get(&key).is_some_and(|entry| entry.can_validate());
            if !revalidatable && index.remove(&key).is_some() {
                tracing::trace!(target: "restful::cache", key = %key, "Dropped expired entry");
                self.stats.record_eviction();
                dropped += 1;
            }
        }
        dropped
    }

    /// Unlink `key` if a reader found it expired with nothing to revalidate.
    pub(super) fn discard_expired(&self, key: &CacheKey) {
        let mut index = self.index.write();
        let expired = index
            .get(key)
            .is_some_and(|entry| entry.is_stale(Instant::now()) && !entry.can_validate());

        if expired && index.remove(key).is_some() {
            tracing::trace!(target: "restful::cache", key = %key, "Dropped expired entry on lookup");
            self.stats.record_eviction();
        }
    }

    /// Drop every expired entry that cannot be revalidated.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut index = self.index.write();
        let purged = self.drop_expired(&mut index, Instant::now());

        if purged > 0 {
            tracing::debug!(target: "restful::cache", purged, remaining = index.len(), "Purged expired entries");
        }
        purged
    }
}
