//! Cache key derivation
//!
//! A key is the request method plus the absolute URL, query string included.
//! Request headers never participate in the key.

use std::fmt;

use http::Method;
use url::Url;

/// Cache key for HTTP responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Method,
    url: String,
}

impl CacheKey {
    /// Create cache key from request components
    #[must_use]
    pub fn new(method: &Method, url: &Url) -> Self {
        let mut url = url.clone();
        // Fragments are never sent to the server
        url.set_fragment(None);

        Self {
            method: method.clone(),
            url: url.into(),
        }
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bytes this key contributes to an entry's accounted size
    pub(crate) fn footprint(&self) -> usize {
        self.method.as_str().len() + self.url.len()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
