//! A single unresolved request: verb, target and optional body
//!
//! Operations are what callers register on a fork-join batch or hand to the
//! async dispatcher. The client resolves the target against its base URL and
//! merges its default headers when the operation runs.

use bytes::Bytes;
use http::Method;

/// One HTTP call waiting to be executed
#[derive(Debug, Clone)]
pub struct Operation {
    method: Method,
    target: String,
    body: Option<Bytes>,
    query: Vec<(String, String)>,
}

impl Operation {
    /// Create an operation for an arbitrary method
    #[must_use]
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            body: None,
            query: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    #[must_use]
    pub fn post(target: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new(Method::POST, target).with_body(body)
    }

    #[must_use]
    pub fn put(target: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new(Method::PUT, target).with_body(body)
    }

    #[must_use]
    pub fn patch(target: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new(Method::PATCH, target).with_body(body)
    }

    #[must_use]
    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::DELETE, target)
    }

    #[must_use]
    pub fn head(target: impl Into<String>) -> Self {
        Self::new(Method::HEAD, target)
    }

    #[must_use]
    pub fn options(target: impl Into<String>) -> Self {
        Self::new(Method::OPTIONS, target)
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a query-string pair
    #[must_use]
    pub fn query(mut self, field: &str, value: &str) -> Self {
        self.query.push((field.to_string(), value.to_string()));
        self
    }

    /// Add several query-string pairs
    #[must_use]
    pub fn query_params(mut self, params: &[(&str, &str)]) -> Self {
        self.query
            .extend(params.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// True for verbs whose responses may be stored in the response cache
    #[inline]
    pub fn is_cacheable_verb(&self) -> bool {
        self.method == Method::GET
    }
}
