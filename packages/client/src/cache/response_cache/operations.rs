//! Cache operations for lookup, put, and revalidation
//!
//! Lookups run under the shared lock and only bump the entry's access stamp.
//! Inserts and refreshes take the exclusive lock, make room first and then
//! link the new entry, so readers never observe the cache above its ceiling.

use std::time::Instant;

use super::super::{
    cache_entry::{CacheEntry, estimate_size},
    cache_key::CacheKey,
    freshness::{Freshness, Validators},
};
use super::core::ResponseCache;
use crate::http::HttpResponse;

/// Outcome of a cache lookup
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Entry is within its TTL and may be served as-is
    Fresh(HttpResponse),
    /// Entry is past its TTL but can be revalidated with a conditional request
    Stale(StaleEntry),
    /// Nothing usable is stored under the key
    Miss,
}

/// Snapshot of a stale entry taken at lookup time
#[derive(Debug, Clone)]
pub struct StaleEntry {
    pub response: HttpResponse,
    pub validators: Validators,
}

impl ResponseCache {
    /// Look up `key`, classifying the stored entry by freshness
    pub fn lookup(&self, key: &CacheKey) -> CacheLookup {
        let index = self.index.read();

        let Some(entry) = index.get(key) else {
            self.stats.record_miss();
            return CacheLookup::Miss;
        };

        if !entry.is_stale(Instant::now()) {
            entry.touch(self.next_stamp());
            self.stats.record_hit();
            tracing::trace!(target: "restful::cache", key = %key, "Cache hit");
            return CacheLookup::Fresh(entry.response.clone().with_from_cache(true));
        }

        if !entry.can_validate() {
            drop(index);
            self.discard_expired(key);
            self.stats.record_miss();
            return CacheLookup::Miss;
        }

        entry.touch(self.next_stamp());
        self.stats.record_revalidation();
        tracing::trace!(target: "restful::cache", key = %key, "Stale entry needs revalidation");

        CacheLookup::Stale(StaleEntry {
            response: entry.response.clone(),
            validators: entry.validators.clone(),
        })
    }

    /// Get cached response if present and fresh
    pub fn get(&self, key: &CacheKey) -> Option<HttpResponse> {
        match self.lookup(key) {
            CacheLookup::Fresh(response) => Some(response),
            CacheLookup::Stale(_) | CacheLookup::Miss => None,
        }
    }

    /// Store `response` under `key`, replacing any existing entry.
    ///
    /// Returns `false` when the entry was not stored: its size could not be
    /// computed or it alone exceeds the configured ceiling.
    pub fn put(&self, key: CacheKey, response: HttpResponse, freshness: Freshness) -> bool {
        let Some(size) = self.admit(&key, &response, &freshness.validators) else {
            return false;
        };

        let entry = CacheEntry::new(response.with_from_cache(false), size, freshness, Instant::now());

        let mut index = self.index.write();
        if index.remove(&key).is_some() {
            tracing::trace!(target: "restful::cache", key = %key, "Replacing existing entry");
        }
        self.drop_expired(&mut index, Instant::now());

        let evicted = self.evict_until_fits(&mut index, size);
        if evicted > 0 {
            tracing::debug!(
                target: "restful::cache",
                evicted_count = evicted,
                entry_size = size,
                total_size = index.total_size(),
                max_cache_size = self.config.max_cache_size,
                "Cache evicted entries to make room"
            );
        }

        index.insert(key, entry, self.next_stamp());
        true
    }

    /// Apply a `304 Not Modified` to the entry under `key`.
    ///
    /// The stored body is kept; TTL and validators are replaced, with any
    /// validator the server omitted carried over from the old entry. Returns
    /// the preserved response, or `None` if the entry is gone.
    pub fn refresh(&self, key: &CacheKey, freshness: Freshness) -> Option<HttpResponse> {
        let mut index = self.index.write();
        let previous = index.remove(key)?;

        let validators = freshness.validators.or(&previous.validators);
        let response = previous.response;

        let Some(size) = self.admit(key, &response, &validators) else {
            return Some(response.with_from_cache(true));
        };

        self.evict_until_fits(&mut index, size);

        let entry = CacheEntry::new(
            response.clone(),
            size,
            Freshness::new(freshness.ttl, validators),
            Instant::now(),
        );
        index.insert(key.clone(), entry, self.next_stamp());
        self.stats.record_refresh();

        tracing::debug!(target: "restful::cache", key = %key, ttl = ?freshness.ttl, "Entry refreshed by 304");

        Some(response.with_from_cache(true))
    }

    /// Remove the entry under `key`, returning whether one existed
    pub fn remove(&self, key: &CacheKey) -> bool {
        self.index.write().remove(key).is_some()
    }

    /// Size an entry and decide whether it may enter the cache at all
    fn admit(&self, key: &CacheKey, response: &HttpResponse, validators: &Validators) -> Option<u64> {
        let size = match estimate_size(key, response, validators) {
            Ok(size) => size,
            Err(err) => {
                tracing::warn!(target: "restful::cache", key = %key, error = %err, "Skipping cache insert");
                self.stats.record_skip();
                return None;
            }
        };

        if size > self.config.max_cache_size {
            tracing::debug!(
                target: "restful::cache",
                key = %key,
                entry_size = size,
                max_cache_size = self.config.max_cache_size,
                "Entry larger than the cache ceiling, not caching"
            );
            self.stats.record_skip();
            return None;
        }

        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use http::{HeaderMap, HeaderValue, Method, StatusCode};
    use url::Url;

    use super::*;
    use crate::cache::CacheConfig;

    fn url(path: &str) -> Url {
        Url::parse(&format!("http://localhost{path}")).unwrap()
    }

    fn response(path: &str, body: &'static str, headers: HeaderMap) -> HttpResponse {
        HttpResponse::new(Method::GET, url(path), StatusCode::OK, headers, Bytes::from_static(body.as_bytes()))
    }

    fn key(path: &str) -> CacheKey {
        CacheKey::new(&Method::GET, &url(path))
    }

    fn etag_headers(tag: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(http::header::ETAG, HeaderValue::from_static(tag));
        h
    }

    #[test]
    fn fresh_entry_is_returned_byte_for_byte() {
        let cache = ResponseCache::default();
        assert!(cache.put(key("/a"), response("/a", "payload", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60))));

        let hit = cache.get(&key("/a")).expect("expected a hit");
        assert_eq!(hit.bytes().as_ref(), b"payload");
        assert!(hit.from_cache());
        assert_eq!(cache.stats().snapshot().hits, 1);
    }

    #[test]
    fn elapsed_ttl_without_validators_is_a_miss() {
        let cache = ResponseCache::default();
        cache.put(key("/a"), response("/a", "x", HeaderMap::new()), Freshness::ttl(Duration::from_millis(20)));
        std::thread::sleep(Duration::from_millis(40));

        assert!(matches!(cache.lookup(&key("/a")), CacheLookup::Miss));
        assert!(cache.is_empty());
        assert_eq!(cache.total_size(), 0);
    }

    #[test]
    fn put_sweeps_expired_entries() {
        let cache = ResponseCache::default();
        cache.put(key("/short"), response("/short", "x", HeaderMap::new()), Freshness::ttl(Duration::from_millis(5)));
        let tagged = Freshness::new(Some(Duration::from_millis(5)), Validators::from_headers(&etag_headers("\"v1\"")));
        cache.put(key("/tagged"), response("/tagged", "x", etag_headers("\"v1\"")), tagged);
        std::thread::sleep(Duration::from_millis(30));

        cache.put(key("/new"), response("/new", "x", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60)));

        assert_eq!(cache.len(), 2);
        assert!(cache.index.read().get(&key("/short")).is_none());
        assert!(matches!(cache.lookup(&key("/tagged")), CacheLookup::Stale(_)));
        let index = cache.index.read();
        assert_eq!(index.total_size(), index.recount());
    }

    #[test]
    fn racing_puts_for_one_key_leave_a_single_entry() {
        let cache = std::sync::Arc::new(ResponseCache::default());
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(8));

        let writers: Vec<_> = (0..8)
            .map(|_| {
                let cache = std::sync::Arc::clone(&cache);
                let barrier = std::sync::Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    cache.put(key("/race"), response("/race", "same", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60)))
                })
            })
            .collect();
        for writer in writers {
            assert!(writer.join().unwrap());
        }

        let expected = estimate_size(&key("/race"), &response("/race", "same", HeaderMap::new()), &Validators::default()).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_size(), expected);
        let index = cache.index.read();
        assert_eq!(index.recount(), expected);
        assert!(index.linkage_consistent());
    }

    #[test]
    fn untimed_entry_with_validators_is_stale_immediately() {
        let cache = ResponseCache::default();
        let freshness = Freshness::new(None, Validators::from_headers(&etag_headers("\"v1\"")));
        cache.put(key("/a"), response("/a", "x", etag_headers("\"v1\"")), freshness);

        match cache.lookup(&key("/a")) {
            CacheLookup::Stale(stale) => assert_eq!(stale.validators.etag.as_deref(), Some("\"v1\"")),
            other => panic!("expected stale, got {other:?}"),
        }
    }

    #[test]
    fn refresh_keeps_body_and_extends_ttl() {
        let cache = ResponseCache::default();
        let validators = Validators::from_headers(&etag_headers("\"v1\""));
        cache.put(key("/a"), response("/a", "original", etag_headers("\"v1\"")), Freshness::new(None, validators));

        let refreshed = cache
            .refresh(&key("/a"), Freshness::ttl(Duration::from_secs(60)))
            .expect("entry should still exist");
        assert_eq!(refreshed.bytes().as_ref(), b"original");

        let hit = cache.get(&key("/a")).expect("refreshed entry is fresh");
        assert_eq!(hit.bytes().as_ref(), b"original");

        let index = cache.index.read();
        let entry = index.get(&key("/a")).expect("entry missing");
        assert_eq!(entry.validators().etag.as_deref(), Some("\"v1\""));
        drop(index);
        assert_eq!(cache.stats().snapshot().refreshes, 1);
    }

    #[test]
    fn refresh_of_missing_entry_returns_none() {
        let cache = ResponseCache::default();
        assert!(cache.refresh(&key("/gone"), Freshness::ttl(Duration::from_secs(1))).is_none());
    }

    #[test]
    fn oversized_entry_is_skipped() {
        let cache = ResponseCache::new(CacheConfig::default().with_max_cache_size(64));
        assert!(!cache.put(key("/a"), response("/a", "x", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60))));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().snapshot().skipped, 1);
    }

    #[test]
    fn size_ceiling_holds_after_every_put() {
        let unit = estimate_size(&key("/p000"), &response("/p000", "body", HeaderMap::new()), &Validators::default())
            .unwrap();
        let cache = ResponseCache::new(CacheConfig::default().with_max_cache_size(unit * 3 + unit / 2));

        for i in 0..50u64 {
            let path = format!("/p{i:03}");
            let ttl = Duration::from_secs(100 + (i % 7));
            assert!(cache.put(key(&path), response(&path, "body", HeaderMap::new()), Freshness::ttl(ttl)));
            assert!(cache.total_size() <= cache.config().max_cache_size);
            let index = cache.index.read();
            assert_eq!(index.total_size(), index.recount());
            assert!(index.linkage_consistent());
        }
        assert_eq!(cache.len(), 3);
        assert!(cache.stats().snapshot().evictions >= 47);
    }

    #[test]
    fn soonest_expiring_entry_is_evicted_first() {
        let unit = estimate_size(&key("/a"), &response("/a", "x", HeaderMap::new()), &Validators::default())
            .unwrap();
        let cache = ResponseCache::new(CacheConfig::default().with_max_cache_size(unit * 2));

        cache.put(key("/a"), response("/a", "x", HeaderMap::new()), Freshness::ttl(Duration::from_secs(300)));
        cache.put(key("/b"), response("/b", "x", HeaderMap::new()), Freshness::ttl(Duration::from_secs(5)));
        cache.put(key("/c"), response("/c", "x", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60)));

        assert!(cache.get(&key("/b")).is_none());
        assert!(cache.get(&key("/a")).is_some());
        assert!(cache.get(&key("/c")).is_some());
    }

    #[test]
    fn put_on_existing_key_replaces_entry() {
        let cache = ResponseCache::default();
        cache.put(key("/a"), response("/a", "one", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60)));
        cache.put(key("/a"), response("/a", "two", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60)));

        assert_eq!(cache.len(), 1);
        let hit = cache.get(&key("/a")).expect("expected a hit");
        assert_eq!(hit.bytes().as_ref(), b"two");
    }

    #[test]
    fn remove_and_clear_reset_accounting() {
        let cache = ResponseCache::default();
        cache.put(key("/a"), response("/a", "x", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60)));
        cache.put(key("/b"), response("/b", "x", HeaderMap::new()), Freshness::ttl(Duration::from_secs(60)));

        assert!(cache.remove(&key("/a")));
        assert!(!cache.remove(&key("/a")));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_size(), 0);
    }
}
