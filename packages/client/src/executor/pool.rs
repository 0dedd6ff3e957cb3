//! Connection pool registry
//!
//! Clients without a custom pool share one lazily created executor for the
//! whole process. A client with a custom pool gets an executor of its own.

use std::sync::{Arc, OnceLock};

use super::{HyperExecutor, RequestExecutor};
use crate::config::PoolConfig;
use crate::error::Result;

static SHARED: OnceLock<Result<Arc<HyperExecutor>>> = OnceLock::new();

/// The process-wide executor backing the default connection pool
///
/// # Errors
///
/// Returns the error from the first failed initialization; the shared
/// executor is never retried once it failed to start.
pub fn shared_executor() -> Result<Arc<dyn RequestExecutor>> {
    let shared = SHARED.get_or_init(|| HyperExecutor::new(PoolConfig::default()).map(Arc::new));
    match shared {
        Ok(executor) => Ok(Arc::clone(executor) as Arc<dyn RequestExecutor>),
        Err(err) => Err(err.clone()),
    }
}

/// Pick the executor for a client: the shared pool, or a dedicated one
///
/// # Errors
///
/// Returns a builder error if a dedicated executor cannot be started.
pub fn executor_for(custom_pool: Option<&PoolConfig>) -> Result<Arc<dyn RequestExecutor>> {
    match custom_pool {
        Some(pool) => {
            let executor: Arc<dyn RequestExecutor> = Arc::new(HyperExecutor::new(pool.clone())?);
            Ok(executor)
        }
        None => shared_executor(),
    }
}
