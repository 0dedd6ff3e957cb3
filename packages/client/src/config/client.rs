//! Per-client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::pool::PoolConfig;
use crate::cache::CacheConfig;

/// Timeout applied to each request unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("restful/", env!("CARGO_PKG_VERSION"));

/// Everything a client needs to know at construction time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix joined to every request target
    pub base_url: Option<String>,
    /// Headers sent with every request
    pub headers: Vec<(String, String)>,
    pub user_agent: String,
    /// Bound for each individual request
    pub timeout: Duration,
    /// Send requests without any timeout
    pub disable_timeout: bool,
    /// Bypass the response cache entirely
    pub disable_cache: bool,
    /// Use a dedicated connection pool instead of the shared default one
    pub custom_pool: Option<PoolConfig>,
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            disable_timeout: false,
            disable_cache: false,
            custom_pool: None,
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_disable_timeout(mut self, disable: bool) -> Self {
        self.disable_timeout = disable;
        self
    }

    #[must_use]
    pub fn with_disable_cache(mut self, disable: bool) -> Self {
        self.disable_cache = disable;
        self
    }

    #[must_use]
    pub fn with_custom_pool(mut self, pool: PoolConfig) -> Self {
        self.custom_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// The timeout each request is sent with, if any
    #[inline]
    pub fn effective_timeout(&self) -> Option<Duration> {
        (!self.disable_timeout).then_some(self.timeout)
    }
}
