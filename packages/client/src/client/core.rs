//! Core HTTP client implementation
//!
//! Provides the main HttpClient: URL resolution, default headers, the cache
//! and revalidation flow for GET, and the three calling conventions
//! (blocking, dispatched and fork-join).

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, USER_AGENT};
use http::{HeaderMap, StatusCode};
use url::Url;

use super::stats::ClientStats;
use crate::cache::{CacheKey, CacheLookup, Freshness, ResponseCache, StaleEntry, classify};
use crate::concurrent::{self, Batch, ForkJoinResults, FutureResult, OperationRunner};
use crate::config::ClientConfig;
use crate::error::{self, Result};
use crate::executor::{self, RequestExecutor};
use crate::http::{HttpRequest, HttpResponse, Operation};

/// Caching HTTP client
///
/// Cheap to clone; clones share configuration, cache, connection pool and
/// statistics.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    default_headers: HeaderMap,
    executor: Arc<dyn RequestExecutor>,
    cache: Option<ResponseCache>,
    stats: ClientStats,
    created_at: Instant,
}

impl HttpClient {
    /// Create a client backed by the shared pool or the configured custom pool
    ///
    /// # Errors
    ///
    /// Returns a builder error if the configuration is invalid or the
    /// executor cannot be started.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate().map_err(error::builder)?;
        let executor = executor::executor_for(config.custom_pool.as_ref())?;
        Self::with_executor(config, executor)
    }

    /// Create a client that sends every request through `executor`
    ///
    /// # Errors
    ///
    /// Returns a builder error if the configuration is invalid.
    pub fn with_executor(config: ClientConfig, executor: Arc<dyn RequestExecutor>) -> Result<Self> {
        config.validate().map_err(error::builder)?;
        let default_headers = default_headers(&config)?;

        let cache = (!config.disable_cache).then(|| ResponseCache::new(config.cache.clone()));

        tracing::debug!(
            target: "restful::client",
            base_url = ?config.base_url,
            executor = executor.name(),
            cache_enabled = cache.is_some(),
            timeout = ?config.effective_timeout(),
            "HTTP client created"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                default_headers,
                executor,
                cache,
                stats: ClientStats::new(),
                created_at: Instant::now(),
            }),
        })
    }

    /// Get current configuration
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The response cache, unless caching is disabled
    #[inline]
    pub fn cache(&self) -> Option<&ResponseCache> {
        self.inner.cache.as_ref()
    }

    /// Get client statistics
    #[inline]
    pub fn stats(&self) -> &ClientStats {
        &self.inner.stats
    }

    /// Get client uptime
    #[inline]
    pub fn uptime(&self) -> std::time::Duration {
        self.inner.created_at.elapsed()
    }

    /// Run one operation on the calling thread
    ///
    /// # Errors
    ///
    /// Returns an error if the target does not resolve to a URL or the
    /// request failed in transport. Non-2xx statuses are responses.
    pub fn execute(&self, operation: &Operation) -> Result<HttpResponse> {
        self.inner.run(operation)
    }

    pub fn get(&self, target: &str) -> Result<HttpResponse> {
        self.execute(&Operation::get(target))
    }

    pub fn post(&self, target: &str, body: impl Into<Bytes>) -> Result<HttpResponse> {
        self.execute(&Operation::post(target, body))
    }

    pub fn put(&self, target: &str, body: impl Into<Bytes>) -> Result<HttpResponse> {
        self.execute(&Operation::put(target, body))
    }

    pub fn patch(&self, target: &str, body: impl Into<Bytes>) -> Result<HttpResponse> {
        self.execute(&Operation::patch(target, body))
    }

    pub fn delete(&self, target: &str) -> Result<HttpResponse> {
        self.execute(&Operation::delete(target))
    }

    pub fn head(&self, target: &str) -> Result<HttpResponse> {
        self.execute(&Operation::head(target))
    }

    pub fn options(&self, target: &str) -> Result<HttpResponse> {
        self.execute(&Operation::options(target))
    }

    /// Run `operation` on its own worker; returns immediately
    pub fn async_execute(&self, operation: Operation) -> FutureResult {
        concurrent::dispatch(self.runner(), operation)
    }

    /// Run `operation` on its own worker and hand the outcome to `callback`
    pub fn async_execute_with<C>(&self, operation: Operation, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        concurrent::dispatch_with(self.runner(), operation, callback)
    }

    pub fn async_get(&self, target: &str) -> FutureResult {
        self.async_execute(Operation::get(target))
    }

    pub fn async_post(&self, target: &str, body: impl Into<Bytes>) -> FutureResult {
        self.async_execute(Operation::post(target, body))
    }

    pub fn async_put(&self, target: &str, body: impl Into<Bytes>) -> FutureResult {
        self.async_execute(Operation::put(target, body))
    }

    pub fn async_patch(&self, target: &str, body: impl Into<Bytes>) -> FutureResult {
        self.async_execute(Operation::patch(target, body))
    }

    pub fn async_delete(&self, target: &str) -> FutureResult {
        self.async_execute(Operation::delete(target))
    }

    pub fn async_head(&self, target: &str) -> FutureResult {
        self.async_execute(Operation::head(target))
    }

    pub fn async_options(&self, target: &str) -> FutureResult {
        self.async_execute(Operation::options(target))
    }

    pub fn async_get_with<C>(&self, target: &str, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        self.async_execute_with(Operation::get(target), callback)
    }

    pub fn async_post_with<C>(&self, target: &str, body: impl Into<Bytes>, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        self.async_execute_with(Operation::post(target, body), callback)
    }

    pub fn async_put_with<C>(&self, target: &str, body: impl Into<Bytes>, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        self.async_execute_with(Operation::put(target, body), callback)
    }

    pub fn async_patch_with<C>(&self, target: &str, body: impl Into<Bytes>, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        self.async_execute_with(Operation::patch(target, body), callback)
    }

    pub fn async_delete_with<C>(&self, target: &str, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        self.async_execute_with(Operation::delete(target), callback)
    }

    pub fn async_head_with<C>(&self, target: &str, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        self.async_execute_with(Operation::head(target), callback)
    }

    pub fn async_options_with<C>(&self, target: &str, callback: C) -> FutureResult
    where
        C: FnOnce(&Result<HttpResponse>) + Send + 'static,
    {
        self.async_execute_with(Operation::options(target), callback)
    }

    /// Register operations in `build`, run them all concurrently and wait.
    ///
    /// Results come back in registration order.
    pub fn fork_join<F>(&self, build: F) -> ForkJoinResults
    where
        F: FnOnce(&mut Batch),
    {
        concurrent::fork_join(self.runner(), build)
    }

    fn runner(&self) -> Arc<dyn OperationRunner> {
        self.inner.clone()
    }
}

impl OperationRunner for ClientInner {
    fn run(&self, operation: &Operation) -> Result<HttpResponse> {
        self.stats.record_request();

        let request = self.prepare(operation).inspect_err(|_| self.stats.record_failure())?;

        match &self.cache {
            Some(cache) if operation.is_cacheable_verb() => self.through_cache(cache, request),
            _ => self.send(&request),
        }
    }
}

impl ClientInner {
    fn resolve(&self, target: &str) -> Result<Url> {
        let joined;
        let full = match &self.config.base_url {
            Some(base) => {
                joined = format!("{base}{target}");
                joined.as_str()
            }
            None => target,
        };
        Url::parse(full).map_err(error::invalid_url)
    }

    fn prepare(&self, operation: &Operation) -> Result<HttpRequest> {
        let url = self.resolve(operation.target())?;

        Ok(HttpRequest::new(operation.method().clone(), url)
            .with_query_params(&operation.query_pairs())
            .with_headers(self.default_headers.clone())
            .with_body(operation.body().cloned())
            .with_timeout(self.config.effective_timeout()))
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.stats.record_sent();
        self.executor.execute(request).inspect_err(|err| {
            self.stats.record_failure();
            tracing::debug!(
                target: "restful::client",
                method = %request.method(),
                url = %request.url(),
                error = %err,
                "Request failed"
            );
        })
    }

    fn through_cache(&self, cache: &ResponseCache, request: HttpRequest) -> Result<HttpResponse> {
        let key = CacheKey::new(request.method(), request.url());

        match cache.lookup(&key) {
            CacheLookup::Fresh(response) => {
                self.stats.record_cache_hit();
                Ok(response)
            }
            CacheLookup::Stale(stale) => {
                self.stats.record_revalidation();
                self.revalidate(cache, key, request, stale)
            }
            CacheLookup::Miss => {
                self.stats.record_cache_miss();
                let response = self.send(&request)?;
                self.store(cache, key, &response);
                Ok(response)
            }
        }
    }

    /// Conditional request for a stale entry.
    ///
    /// A transport error leaves the stale entry untouched.
    fn revalidate(&self, cache: &ResponseCache, key: CacheKey, mut request: HttpRequest, stale: StaleEntry) -> Result<HttpResponse> {
        stale.validators.apply_conditional(request.headers_mut());

        let response = self.send(&request)?;

        if response.status() != StatusCode::NOT_MODIFIED {
            tracing::debug!(
                target: "restful::client",
                key = %key,
                status = %response.status(),
                "Revalidation returned a new representation"
            );
            self.store(cache, key, &response);
            return Ok(response);
        }

        self.stats.record_not_modified();
        let default_ttl = self.config.cache.default_ttl;

        let Some(freshness) = Freshness::revalidated(response.headers(), &stale.validators, default_ttl) else {
            cache.remove(&key);
            return Ok(stale.response.with_from_cache(true));
        };

        match cache.refresh(&key, freshness.clone()) {
            Some(refreshed) => Ok(refreshed),
            None => {
                // Evicted while the conditional request was in flight
                cache.put(key, stale.response.clone(), freshness);
                Ok(stale.response.with_from_cache(true))
            }
        }
    }

    /// Store a fetched response, or drop the entry if it is not cacheable
    fn store(&self, cache: &ResponseCache, key: CacheKey, response: &HttpResponse) {
        match classify(response.status(), response.headers(), self.config.cache.default_ttl) {
            Some(freshness) => {
                cache.put(key, response.clone(), freshness);
            }
            None => {
                if cache.remove(&key) {
                    tracing::debug!(target: "restful::client", key = %key, "Dropped entry for uncacheable response");
                }
            }
        }
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(config.headers.len() + 1);

    let user_agent = HeaderValue::from_str(&config.user_agent).map_err(error::invalid_header)?;
    headers.insert(USER_AGENT, user_agent);

    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(error::invalid_header)?;
        let value = HeaderValue::from_str(value).map_err(error::invalid_header)?;
        if name == USER_AGENT {
            headers.insert(name, value);
        } else {
            headers.append(name, value);
        }
    }

    Ok(headers)
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.config.base_url)
            .field("executor", &self.inner.executor.name())
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}
