//! HTTP response types
//!
//! Responses are fully materialized: the body is read into `Bytes` before the
//! response leaves the executor, so a response can be shared between the cache
//! and any number of readers without copying.

use std::fmt::Write as _;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode, Version};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{self, Result};

/// A complete HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    /// Method and URL of the request that produced this response
    method: Method,
    url: Url,
    request_headers: HeaderMap,
    /// Set when the response was served from the response cache
    from_cache: bool,
}

impl HttpResponse {
    /// Create a response for a request to `url`
    #[must_use]
    pub fn new(method: Method, url: Url, status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers,
            body,
            method,
            url,
            request_headers: HeaderMap::new(),
            from_cache: false,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_request_headers(mut self, headers: HeaderMap) -> Self {
        self.request_headers = headers;
        self
    }

    #[must_use]
    pub(crate) fn with_from_cache(mut self, from_cache: bool) -> Self {
        self.from_cache = from_cache;
        self
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Headers that were sent with the request
    #[inline]
    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    /// Get a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Get a header value as `&str`, if it is valid visible ASCII
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// The response body
    #[inline]
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// The response body as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of the `Content-Type` header
    pub fn content_type(&self) -> Option<&str> {
        self.header_str("content-type")
    }

    /// Deserialize the body as JSON
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| error::decode(e).with_url(self.url.clone()))
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// True when the status is in the 2xx range
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// True when this response was served from the response cache
    #[inline]
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Human readable dump of the request and the response
    pub fn debug(&self) -> String {
        let mut out = String::from("REQUEST\n--------\n");
        let _ = writeln!(out, "{} {} {:?}", self.method, self.url, self.version);
        write_headers(&mut out, &self.request_headers);

        out.push_str("\n\nRESPONSE\n--------\n");
        let _ = writeln!(out, "{:?} {}", self.version, self.status);
        write_headers(&mut out, &self.headers);
        out.push('\n');
        out.push_str(&self.text());

        out
    }
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let _ = writeln!(out, "{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &'static str) -> HttpResponse {
        let url = Url::parse("http://localhost/user").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        HttpResponse::new(Method::GET, url, StatusCode::OK, headers, Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn bytes_and_text_agree() {
        let resp = response("[{\"name\":\"Hernan\"}]");
        assert_eq!(resp.text().as_bytes(), resp.bytes().as_ref());
        assert_eq!(resp.header_str("Content-Type"), Some("application/json"));
    }

    #[test]
    fn debug_dump_contains_both_sides() {
        let dump = response("hello").debug();
        assert!(dump.starts_with("REQUEST\n"));
        assert!(dump.contains("GET http://localhost/user"));
        assert!(dump.contains("RESPONSE"));
        assert!(dump.contains("200 OK"));
        assert!(dump.ends_with("hello"));
    }

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct User {
        name: String,
    }

    #[test]
    fn json_body_decodes_into_a_struct() {
        let resp = response("[{\"name\":\"Hernan\"}]");
        let users: Vec<User> = resp.json().unwrap();
        assert_eq!(users, vec![User { name: "Hernan".to_string() }]);
        assert_eq!(resp.content_type(), Some("application/json"));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = response("<user/>").json::<Vec<User>>().unwrap_err();
        assert!(err.is_decode());
        assert!(!err.is_transport());
        assert_eq!(err.url().map(Url::as_str), Some("http://localhost/user"));
    }
}
