//! restful public API
//!
//! REST client with transparent response caching, async dispatch and
//! fork-join request batches.
//!
//! The free functions below run against a process-wide default client built
//! from the default configuration. Build your own client with
//! [`RestBuilder`] for a base URL, custom headers, timeouts or cache limits.
//!
//! ```no_run
//! let response = restful::get("http://localhost:8080/user")?;
//! println!("{}", response.text());
//!
//! let results = restful::fork_join(|batch| {
//!     batch.get("http://localhost:8080/user/1");
//!     batch.delete("http://localhost:8080/user/2");
//! })?;
//! assert_eq!(results.len(), 2);
//! # Ok::<(), restful::HttpError>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

use std::sync::OnceLock;

use bytes::Bytes;

pub mod builder;

pub use builder::{ContentType, RestBuilder, header};

pub use restful_client::error::Result;
pub use restful_client::{
    Batch, CacheConfig, ClientConfig, ClientStatsSnapshot, ForkJoinResults, FutureResult, HttpClient, HttpError,
    HttpRequest, HttpResponse, Operation, PoolConfig, RequestExecutor,
};

static DEFAULT_CLIENT: OnceLock<Result<HttpClient>> = OnceLock::new();

/// The process-wide client used by the free functions
///
/// # Errors
///
/// Returns the error from the first failed initialization.
pub fn default_client() -> Result<HttpClient> {
    DEFAULT_CLIENT
        .get_or_init(|| {
            log::debug!("restful: initializing default client");
            HttpClient::new(ClientConfig::default())
        })
        .clone()
}

/// Create a new client builder
///
/// Shorthand for `RestBuilder::new()`
#[must_use]
pub fn builder() -> RestBuilder {
    RestBuilder::new()
}

/// Issue a GET through the default client
///
/// # Errors
///
/// Returns an error if the default client cannot be created, `url` is not
/// absolute or the request fails in transport.
pub fn get(url: &str) -> Result<HttpResponse> {
    default_client()?.get(url)
}

/// Issue a POST through the default client
///
/// # Errors
///
/// See [`get`].
pub fn post(url: &str, body: impl Into<Bytes>) -> Result<HttpResponse> {
    default_client()?.post(url, body)
}

/// Issue a PUT through the default client
///
/// # Errors
///
/// See [`get`].
pub fn put(url: &str, body: impl Into<Bytes>) -> Result<HttpResponse> {
    default_client()?.put(url, body)
}

/// Issue a PATCH through the default client
///
/// # Errors
///
/// See [`get`].
pub fn patch(url: &str, body: impl Into<Bytes>) -> Result<HttpResponse> {
    default_client()?.patch(url, body)
}

/// Issue a DELETE through the default client
///
/// # Errors
///
/// See [`get`].
pub fn delete(url: &str) -> Result<HttpResponse> {
    default_client()?.delete(url)
}

/// Issue a HEAD through the default client
///
/// # Errors
///
/// See [`get`].
pub fn head(url: &str) -> Result<HttpResponse> {
    default_client()?.head(url)
}

/// Issue an OPTIONS through the default client
///
/// # Errors
///
/// See [`get`].
pub fn options(url: &str) -> Result<HttpResponse> {
    default_client()?.options(url)
}

fn dispatch(operation: Operation) -> FutureResult {
    match default_client() {
        Ok(client) => client.async_execute(operation),
        Err(err) => FutureResult::ready(Err(err)),
    }
}

fn dispatch_with<C>(operation: Operation, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    match default_client() {
        Ok(client) => client.async_execute_with(operation, callback),
        Err(err) => {
            let result = Err(err);
            callback(&result);
            FutureResult::ready(result)
        }
    }
}

/// GET on a worker thread; returns immediately
#[must_use]
pub fn async_get(url: &str) -> FutureResult {
    dispatch(Operation::get(url))
}

#[must_use]
pub fn async_post(url: &str, body: impl Into<Bytes>) -> FutureResult {
    dispatch(Operation::post(url, body))
}

#[must_use]
pub fn async_put(url: &str, body: impl Into<Bytes>) -> FutureResult {
    dispatch(Operation::put(url, body))
}

#[must_use]
pub fn async_patch(url: &str, body: impl Into<Bytes>) -> FutureResult {
    dispatch(Operation::patch(url, body))
}

#[must_use]
pub fn async_delete(url: &str) -> FutureResult {
    dispatch(Operation::delete(url))
}

#[must_use]
pub fn async_head(url: &str) -> FutureResult {
    dispatch(Operation::head(url))
}

#[must_use]
pub fn async_options(url: &str) -> FutureResult {
    dispatch(Operation::options(url))
}

/// GET on a worker thread; `callback` receives the outcome exactly once
pub fn async_get_with<C>(url: &str, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    dispatch_with(Operation::get(url), callback)
}

pub fn async_post_with<C>(url: &str, body: impl Into<Bytes>, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    dispatch_with(Operation::post(url, body), callback)
}

pub fn async_put_with<C>(url: &str, body: impl Into<Bytes>, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    dispatch_with(Operation::put(url, body), callback)
}

pub fn async_patch_with<C>(url: &str, body: impl Into<Bytes>, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    dispatch_with(Operation::patch(url, body), callback)
}

pub fn async_delete_with<C>(url: &str, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    dispatch_with(Operation::delete(url), callback)
}

pub fn async_head_with<C>(url: &str, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    dispatch_with(Operation::head(url), callback)
}

pub fn async_options_with<C>(url: &str, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    dispatch_with(Operation::options(url), callback)
}

/// Run a fork-join batch on the default client
///
/// # Errors
///
/// Returns an error only if the default client cannot be created; failures
/// of individual operations are stored in their futures.
pub fn fork_join<F>(build: F) -> Result<ForkJoinResults>
where
    F: FnOnce(&mut Batch),
{
    Ok(default_client()?.fork_join(build))
}
