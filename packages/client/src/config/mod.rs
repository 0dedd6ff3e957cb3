//! Client configuration
//!
//! Every tunable is an explicit value handed to the client constructor.
//! Defaults are sane; everything is overridable per instance.

pub mod client;
pub mod pool;
pub mod validation;

pub use client::{ClientConfig, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use pool::PoolConfig;
pub use validation::{ConfigError, ConfigResult};
