//! HTTP/1.1 executor on top of hyper
//!
//! Owns a small tokio runtime and a pooled hyper client speaking plain HTTP
//! or HTTP over rustls. Callers are plain
//! threads; each call blocks on the runtime until the response body is fully
//! buffered or the request timeout elapses.

use std::fmt;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tokio::runtime::Runtime;

use super::RequestExecutor;
use super::connector::HttpsConnector;
use crate::config::PoolConfig;
use crate::error::{self, BadScheme, Error, Result, TimedOut};
use crate::http::{HttpRequest, HttpResponse};

/// Default executor: HTTP and HTTPS over a pooled hyper client
pub struct HyperExecutor {
    runtime: Runtime,
    client: Client<HttpsConnector, Full<Bytes>>,
    pool: PoolConfig,
}

impl HyperExecutor {
    /// Build an executor with its own connection pool
    ///
    /// # Errors
    ///
    /// Returns a builder error if the I/O runtime or the TLS configuration
    /// cannot be created.
    pub fn new(pool: PoolConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("restful-io")
            .build()
            .map_err(error::builder)?;

        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);
        let connector = HttpsConnector::new(connector)?;

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(pool.max_idle_per_host)
            .pool_idle_timeout(pool.idle_timeout)
            .build(connector);

        tracing::debug!(
            target: "restful::executor",
            max_idle_per_host = pool.max_idle_per_host,
            idle_timeout = ?pool.idle_timeout,
            "Connection pool created"
        );

        Ok(Self {
            runtime,
            client,
            pool,
        })
    }

    #[inline]
    pub fn pool(&self) -> &PoolConfig {
        &self.pool
    }

    fn to_hyper(request: &HttpRequest) -> Result<http::Request<Full<Bytes>>> {
        let uri: http::Uri = request
            .url()
            .as_str()
            .parse()
            .map_err(|e| error::invalid_url(e).with_url(request.url().clone()))?;

        let body = Full::new(request.body().cloned().unwrap_or_default());

        let mut outgoing = http::Request::builder()
            .method(request.method().clone())
            .uri(uri)
            .body(body)
            .map_err(|e| error::builder(e).with_url(request.url().clone()))?;
        *outgoing.headers_mut() = request.headers().clone();

        Ok(outgoing)
    }
}

impl RequestExecutor for HyperExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        if !matches!(request.url().scheme(), "http" | "https") {
            return Err(error::builder(BadScheme).with_url(request.url().clone()));
        }

        let outgoing = Self::to_hyper(request)?;
        let url = request.url().clone();

        let round_trip = async {
            let response = self.client.request(outgoing).await.map_err(|e| {
                if e.is_connect() {
                    error::connect(e)
                } else {
                    error::request(e)
                }
            })?;

            let (parts, body) = response.into_parts();
            let bytes = body.collect().await.map_err(error::body)?.to_bytes();
            Ok::<_, Error>((parts, bytes))
        };

        tracing::trace!(
            target: "restful::executor",
            method = %request.method(),
            url = %url,
            timeout = ?request.timeout(),
            "Sending request"
        );

        let outcome = match request.timeout() {
            Some(limit) => self
                .runtime
                .block_on(async { tokio::time::timeout(limit, round_trip).await })
                .unwrap_or_else(|_| Err(error::timeout(TimedOut))),
            None => self.runtime.block_on(round_trip),
        };

        let (parts, bytes) = outcome.map_err(|e| e.with_url(url.clone()))?;

        Ok(HttpResponse::new(
            request.method().clone(),
            url,
            parts.status,
            parts.headers,
            bytes,
        )
        .with_version(parts.version)
        .with_request_headers(request.headers().clone()))
    }

    fn name(&self) -> &'static str {
        "hyper-http1"
    }
}

impl fmt::Debug for HyperExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperExecutor")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
