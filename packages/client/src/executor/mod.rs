//! Request execution seam
//!
//! The client never talks to the network directly. It hands a fully resolved
//! `HttpRequest` to a `RequestExecutor` and gets a buffered response or a
//! transport error back.

pub mod connector;
pub mod hyper_executor;
pub mod pool;

pub use connector::{HttpsConnector, MaybeHttpsStream};
pub use hyper_executor::HyperExecutor;
pub use pool::{executor_for, shared_executor};

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round trip
///
/// Implementations own their connection pool and must tolerate concurrent
/// calls from many worker threads. A non-2xx status is a successful
/// response; only failures that prevented a response are errors.
pub trait RequestExecutor: Send + Sync {
    /// Execute `request`, honoring its timeout
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;

    /// Get the executor name for debugging/logging
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for std::sync::Arc<E> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
