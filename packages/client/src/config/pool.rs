//! Connection pool settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Idle-connection limits for one connection pool.
///
/// The executor owning the pool enforces these; the client only forwards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum idle connections kept per host
    pub max_idle_per_host: usize,
    /// How long an idle connection is kept before being closed
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 2,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}
