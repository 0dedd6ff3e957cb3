//! restful prelude
//!
//! The types end users need for HTTP operations.

// Requests and responses
pub use crate::http::{HttpRequest, HttpResponse, Operation};

// Error types
pub use crate::error::{Error, HttpError, Kind, Result};

// Client and its configuration
pub use crate::client::{ClientStats, ClientStatsSnapshot, HttpClient};
pub use crate::config::{ClientConfig, ConfigError, PoolConfig};

// Cache
pub use crate::cache::{CacheConfig, CacheKey, CacheLookup, CacheStatsSnapshot, ResponseCache};

// Concurrency
pub use crate::concurrent::{Batch, ForkJoinResults, FutureResult};

// Transport seam
pub use crate::executor::{HyperExecutor, RequestExecutor};

// HTTP standard types from http crate
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};

// URL handling
pub use url::Url;
