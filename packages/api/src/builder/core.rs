//! Core `RestBuilder` structure and base functionality
//!
//! Contains the `RestBuilder` struct and the methods that shape the client
//! configuration: base URL, timeouts, cache and connection pool.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use restful_client::{CacheConfig, ClientConfig, PoolConfig, RequestExecutor};

/// Fluent builder for an `HttpClient`
///
/// # Examples
/// ```no_run
/// use std::time::Duration;
/// use restful::RestBuilder;
///
/// let client = RestBuilder::new()
///     .base_url("http://localhost:8080")
///     .timeout(Duration::from_millis(500))
///     .max_cache_size(10 * 1024 * 1024)
///     .build()?;
///
/// let users = client.get("/user")?;
/// # Ok::<(), restful::HttpError>(())
/// ```
#[derive(Clone, Default)]
pub struct RestBuilder {
    /// Configuration handed to the client
    pub(crate) config: ClientConfig,
    /// Transport override; the hyper executor is used when unset
    pub(crate) executor: Option<Arc<dyn RequestExecutor>>,
    /// Debug logging enabled flag
    pub(crate) debug_enabled: bool,
}

impl RestBuilder {
    /// Start from the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Enable debug logging for this builder
    ///
    /// When enabled, the builder logs the configuration it builds with
    /// through the `log` facade.
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    /// Prefix joined to every request target
    #[must_use]
    pub fn base_url(mut self, url: &str) -> Self {
        if self.debug_enabled {
            log::debug!("RestBuilder: base url {url}");
        }
        self.config.base_url = Some(url.to_string());
        self
    }

    /// Bound for each individual request
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self.config.disable_timeout = false;
        self
    }

    /// Send requests without any timeout
    #[must_use]
    pub fn disable_timeout(mut self) -> Self {
        self.config.disable_timeout = true;
        self
    }

    /// Bypass the response cache
    #[must_use]
    pub fn disable_cache(mut self) -> Self {
        self.config.disable_cache = true;
        self
    }

    /// Ceiling for the accounted size of the response cache
    #[must_use]
    pub fn max_cache_size(mut self, bytes: u64) -> Self {
        self.config.cache.max_cache_size = bytes;
        self
    }

    /// TTL for responses without explicit freshness information
    #[must_use]
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache.default_ttl = Some(ttl);
        self
    }

    /// Replace the whole cache configuration
    #[must_use]
    pub fn cache_config(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// Use a dedicated connection pool instead of the shared one
    #[must_use]
    pub fn custom_pool(mut self, pool: PoolConfig) -> Self {
        self.config.custom_pool = Some(pool);
        self
    }

    /// Send requests through `executor` instead of the built-in transport
    #[must_use]
    pub fn executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Configuration as collected so far
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl fmt::Debug for RestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestBuilder")
            .field("config", &self.config)
            .field("executor", &self.executor.as_ref().map(|e| e.name()))
            .field("debug_enabled", &self.debug_enabled)
            .finish()
    }
}
