//! Configuration validation

use std::time::Duration;

use super::client::ClientConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Upper bound for any request timeout
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

impl ClientConfig {
    /// Validate the configuration before a client is built from it
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` variant if any validation fails:
    /// - `InvalidTimeout` - if timeouts are enabled and the timeout is zero or exceeds one hour
    /// - `InvalidParameter` - if the user agent is empty or a pool allows zero idle connections
    /// - `InvalidBaseUrl` - if the base url is not an absolute URL
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.disable_timeout {
            validate_timeout(self.timeout, "timeout")?;
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidParameter(
                "user agent cannot be empty".to_string(),
            ));
        }

        if let Some(pool) = &self.custom_pool {
            if pool.max_idle_per_host == 0 {
                return Err(ConfigError::InvalidParameter(
                    "max_idle_per_host must be at least 1".to_string(),
                ));
            }
        }

        if let Some(base) = &self.base_url {
            url::Url::parse(base).map_err(|e| ConfigError::InvalidBaseUrl {
                url: base.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Validate timeout duration
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` if the duration is zero or exceeds one hour
pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
    if timeout.is_zero() {
        return Err(ConfigError::InvalidTimeout(format!("{name} cannot be zero")));
    }

    if timeout > MAX_TIMEOUT {
        return Err(ConfigError::InvalidTimeout(format!(
            "{name} cannot exceed 1 hour"
        )));
    }

    Ok(())
}
