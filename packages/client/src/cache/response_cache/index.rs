//! Arena-style index over cache entries
//!
//! Entries live in a single key -> entry map. The recency and expiry
//! orderings are secondary indexes holding keys, never references, so a
//! removal is a plain map update on all three structures.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use super::super::{cache_entry::CacheEntry, cache_key::CacheKey};

#[derive(Debug, Default)]
pub(crate) struct CacheIndex {
    entries: HashMap<CacheKey, CacheEntry>,
    /// access stamp -> key, oldest first
    recency: BTreeMap<u64, CacheKey>,
    /// (expiry, insertion sequence) -> key, soonest first
    expiry: BTreeMap<(Instant, u64), CacheKey>,
    total_size: u64,
    next_seq: u64,
}

impl CacheIndex {
    pub(crate) fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Link `entry` under `key`, replacing and returning any previous entry
    pub(crate) fn insert(&mut self, key: CacheKey, mut entry: CacheEntry, stamp: u64) -> Option<CacheEntry> {
        let previous = self.remove(&key);

        let expiry_slot = entry.expires_at.map(|at| {
            let slot = (at, self.next_seq);
            self.next_seq += 1;
            slot
        });

        entry.link(stamp, expiry_slot);
        self.recency.insert(stamp, key.clone());
        if let Some(slot) = expiry_slot {
            self.expiry.insert(slot, key.clone());
        }

        self.total_size += entry.size;
        self.entries.insert(key, entry);

        previous
    }

    /// Unlink `key` from the map and both orderings
    pub(crate) fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;

        self.recency.remove(&entry.recency_slot);
        if let Some(slot) = entry.expiry_slot {
            self.expiry.remove(&slot);
        }
        self.total_size -= entry.size;

        Some(entry)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.expiry.clear();
        self.total_size = 0;
    }

    /// Next entry to evict.
    ///
    /// Entries with an expiry go first, soonest expiry first, with ties broken
    /// by least recent access. Entries without expiry follow in LRU order.
    pub(crate) fn victim(&mut self) -> Option<CacheKey> {
        if let Some(key) = self.soonest_expiring() {
            return Some(key);
        }
        self.least_recently_used()
    }

    fn soonest_expiring(&self) -> Option<CacheKey> {
        let (&(deadline, _), _) = self.expiry.first_key_value()?;

        self.expiry
            .range((deadline, 0)..=(deadline, u64::MAX))
            .min_by_key(|(_, key)| self.entries.get(*key).map_or(0, CacheEntry::last_access))
            .map(|(_, key)| key.clone())
    }

    fn least_recently_used(&mut self) -> Option<CacheKey> {
        // Reads bump the entry's access stamp without touching this index;
        // stale links are moved to their current stamp here.
        loop {
            let (slot, key) = self
                .recency
                .first_key_value()
                .map(|(slot, key)| (*slot, key.clone()))?;

            let seen = match self.entries.get_mut(&key) {
                Some(entry) => {
                    let seen = entry.last_access();
                    if seen <= slot {
                        return Some(key);
                    }
                    entry.recency_slot = seen;
                    seen
                }
                None => {
                    self.recency.remove(&slot);
                    continue;
                }
            };

            self.recency.remove(&slot);
            self.recency.insert(seen, key);
        }
    }

    /// Keys whose expiry is at or before `now`, soonest first
    pub(crate) fn expired_keys(&self, now: Instant) -> Vec<CacheKey> {
        self.expiry
            .range(..=(now, u64::MAX))
            .map(|(_, key)| key.clone())
            .collect()
    }

    /// Sum of entry sizes recomputed from the map
    #[cfg(test)]
    pub(crate) fn recount(&self) -> u64 {
        self.entries.values().map(|e| e.size).sum()
    }

    #[cfg(test)]
    pub(crate) fn linkage_consistent(&self) -> bool {
        self.recency.len() == self.entries.len()
            && self.expiry.len() == self.entries.values().filter(|e| e.expires_at.is_some()).count()
            && self.recency.values().all(|k| self.entries.contains_key(k))
            && self.expiry.values().all(|k| self.entries.contains_key(k))
    }
}
