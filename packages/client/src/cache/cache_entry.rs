//! Cache entry management with TTL and validation support
//!
//! Provides `CacheEntry` for storing HTTP responses with expiry, validators
//! and the access stamp used for least-recently-used tie-breaks.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::cache_key::CacheKey;
use super::freshness::{Freshness, Validators};
use crate::http::HttpResponse;

/// Upper bound on a stored TTL; larger freshness lifetimes are clamped to it
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Entry size could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SizeAccountingError {
    #[error("entry size overflows the size accounting counter")]
    Overflow,
}

/// Cached response entry with metadata
#[derive(Debug)]
pub struct CacheEntry {
    pub(crate) response: HttpResponse,
    /// Accounted size, see [`estimate_size`]
    pub(crate) size: u64,
    /// `None` when the entry has no expiry and is always revalidated
    pub(crate) expires_at: Option<Instant>,
    pub(crate) validators: Validators,
    pub(crate) stored_at: Instant,
    /// Stamp under which the entry is linked into the recency index
    pub(crate) recency_slot: u64,
    /// Key under which the entry is linked into the expiry index
    pub(crate) expiry_slot: Option<(Instant, u64)>,
    /// Most recent access stamp; may run ahead of `recency_slot`
    last_access: AtomicU64,
}

impl CacheEntry {
    pub(crate) fn new(response: HttpResponse, size: u64, freshness: Freshness, now: Instant) -> Self {
        let expires_at = freshness.ttl.and_then(|ttl| now.checked_add(ttl.min(MAX_TTL)));

        Self {
            response,
            size,
            expires_at,
            validators: freshness.validators,
            stored_at: now,
            recency_slot: 0,
            expiry_slot: None,
            last_access: AtomicU64::new(0),
        }
    }

    /// Check if the entry may no longer be served without revalidation
    pub fn is_stale(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires| now >= expires)
    }

    /// Check if entry can be validated with conditional request
    pub fn can_validate(&self) -> bool {
        !self.validators.is_empty()
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    #[inline]
    pub fn validators(&self) -> &Validators {
        &self.validators
    }

    #[inline]
    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    /// Record an access; safe under a shared lock
    pub(crate) fn touch(&self, stamp: u64) {
        self.last_access.fetch_max(stamp, Ordering::Relaxed);
    }

    pub(crate) fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }

    pub(crate) fn link(&mut self, stamp: u64, expiry_slot: Option<(Instant, u64)>) {
        self.recency_slot = stamp;
        self.expiry_slot = expiry_slot;
        self.last_access.store(stamp, Ordering::Relaxed);
    }
}

/// Approximate in-memory footprint of an entry.
///
/// Fixed struct sizes plus every variable-length buffer the entry owns. This is
/// an accounting unit for the size ceiling, not an exact byte count.
pub fn estimate_size(
    key: &CacheKey,
    response: &HttpResponse,
    validators: &Validators,
) -> Result<u64, SizeAccountingError> {
    let headers = response
        .headers()
        .iter()
        .try_fold(0usize, |acc, (name, value)| {
            acc.checked_add(name.as_str().len())?
                .checked_add(value.len())
        })
        .ok_or(SizeAccountingError::Overflow)?;

    let total = [
        mem::size_of::<CacheEntry>(),
        mem::size_of::<CacheKey>(),
        key.footprint(),
        response.bytes().len(),
        response.url().as_str().len(),
        headers,
        validators.footprint(),
    ]
    .into_iter()
    .try_fold(0usize, usize::checked_add)
    .ok_or(SizeAccountingError::Overflow)?;

    u64::try_from(total).map_err(|_| SizeAccountingError::Overflow)
}
