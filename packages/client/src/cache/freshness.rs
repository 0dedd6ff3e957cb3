//! Freshness and validator extraction from response headers
//!
//! Decides whether a response may be stored, how long it stays fresh and
//! which validators a later conditional request should echo back.

use std::time::{Duration, SystemTime};

use http::header::{CACHE_CONTROL, ETAG, EXPIRES, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, PRAGMA};
use http::{HeaderMap, HeaderValue, StatusCode};

use super::http_date::httpdate;

/// Server supplied validators used to make revalidation requests conditional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validators {
    pub etag: Option<String>,
    pub last_modified: Option<SystemTime>,
}

impl Validators {
    /// Extract `ETag` and `Last-Modified` from response headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let etag = headers
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let last_modified = headers
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| httpdate::parse_http_date(s).ok());

        Self {
            etag,
            last_modified,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }

    /// Keep `self`'s values, falling back to `previous` for anything missing
    #[must_use]
    pub fn or(self, previous: &Validators) -> Self {
        Self {
            etag: self.etag.or_else(|| previous.etag.clone()),
            last_modified: self.last_modified.or(previous.last_modified),
        }
    }

    /// Add `If-None-Match` / `If-Modified-Since` to an outgoing request
    pub fn apply_conditional(&self, headers: &mut HeaderMap) {
        if let Some(etag) = self.etag.as_deref() {
            if let Ok(value) = HeaderValue::from_str(etag) {
                headers.insert(IF_NONE_MATCH, value);
            }
        }

        if let Some(last_modified) = self.last_modified {
            if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(last_modified)) {
                headers.insert(IF_MODIFIED_SINCE, value);
            }
        }
    }

    /// Bytes these validators contribute to an entry's accounted size
    pub(crate) fn footprint(&self) -> usize {
        self.etag.as_ref().map_or(0, String::len)
            + self
                .last_modified
                .map_or(0, |_| std::mem::size_of::<SystemTime>())
    }
}

/// How long a stored response may be served without contacting the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Freshness {
    /// Time to live from now. `None` means the entry has no expiry and is
    /// always revalidated before use.
    pub ttl: Option<Duration>,
    pub validators: Validators,
}

impl Freshness {
    #[must_use]
    pub fn new(ttl: Option<Duration>, validators: Validators) -> Self {
        Self { ttl, validators }
    }

    /// A fixed TTL with no validators
    #[must_use]
    pub fn ttl(ttl: Duration) -> Self {
        Self::new(Some(ttl), Validators::default())
    }

    /// Derive freshness from response headers alone, ignoring the status.
    ///
    /// Returns `None` when the headers forbid storing the response or when
    /// the response could be neither served fresh nor revalidated.
    pub fn from_headers(headers: &HeaderMap, default_ttl: Option<Duration>) -> Option<Self> {
        Self::derive(headers, Validators::from_headers(headers), default_ttl)
    }

    /// Freshness for an entry confirmed by `304 Not Modified`.
    ///
    /// Validators missing from the 304 are carried over from `previous`.
    /// Returns `None` only when the server now forbids storing the response.
    pub fn revalidated(headers: &HeaderMap, previous: &Validators, default_ttl: Option<Duration>) -> Option<Self> {
        let validators = Validators::from_headers(headers).or(previous);
        Self::derive(headers, validators, default_ttl)
    }

    fn derive(headers: &HeaderMap, validators: Validators, default_ttl: Option<Duration>) -> Option<Self> {
        let directives = CacheDirectives::parse(headers);

        if directives.no_store {
            return None;
        }

        let ttl = if directives.must_revalidate() {
            None
        } else if let Some(max_age) = directives.max_age {
            Some(Duration::from_secs(max_age))
        } else if let Some(expires) = headers.get(EXPIRES) {
            expires_ttl(expires)
        } else {
            default_ttl
        };

        match ttl {
            Some(ttl) if !ttl.is_zero() => Some(Self::new(Some(ttl), validators)),
            // Stale from birth: only worth keeping when it can be revalidated
            _ if !validators.is_empty() => Some(Self::new(None, validators)),
            _ => None,
        }
    }
}

/// Decide whether a GET response may be stored, and for how long
pub fn classify(status: StatusCode, headers: &HeaderMap, default_ttl: Option<Duration>) -> Option<Freshness> {
    if !status.is_success() || status == StatusCode::PARTIAL_CONTENT {
        return None;
    }
    Freshness::from_headers(headers, default_ttl)
}

fn expires_ttl(expires: &HeaderValue) -> Option<Duration> {
    // An unparsable Expires (commonly "0" or "-1") means already expired
    let expires_at = expires
        .to_str()
        .ok()
        .and_then(|s| httpdate::parse_http_date(s).ok())?;

    Some(
        expires_at
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO),
    )
}

#[derive(Debug, Default)]
struct CacheDirectives {
    no_store: bool,
    no_cache: bool,
    private: bool,
    max_age: Option<u64>,
}

impl CacheDirectives {
    fn parse(headers: &HeaderMap) -> Self {
        let mut directives = Self::default();

        for value in headers.get_all(CACHE_CONTROL) {
            let Ok(value) = value.to_str() else { continue };

            for directive in value.split(',') {
                let directive = directive.trim().to_ascii_lowercase();
                match directive.as_str() {
                    "no-store" => directives.no_store = true,
                    "no-cache" => directives.no_cache = true,
                    "private" => directives.private = true,
                    _ => {
                        if let Some(seconds) = directive.strip_prefix("max-age=") {
                            directives.max_age = seconds.trim_matches('"').parse().ok();
                        }
                    }
                }
            }
        }

        if let Some(pragma) = headers.get(PRAGMA).and_then(|v| v.to_str().ok()) {
            if pragma.to_ascii_lowercase().contains("no-cache") {
                directives.no_cache = true;
            }
        }

        directives
    }

    fn must_revalidate(&self) -> bool {
        self.no_cache || self.private || self.max_age == Some(0)
    }
}
