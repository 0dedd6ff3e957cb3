//! Single-operation asynchronous dispatch

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use super::{FutureResult, OperationRunner, worker};
use crate::error::Result;
use crate::http::{HttpResponse, Operation};

/// Run `operation` on its own worker and return its future immediately
pub fn dispatch(runner: Arc<dyn OperationRunner>, operation: Operation) -> FutureResult {
    let future = FutureResult::pending();
    tracing::trace!(
        target: "restful::concurrent",
        method = %operation.method(),
        target_url = operation.target(),
        "Dispatching operation"
    );
    worker::spawn(runner, operation, future.clone(), |_| {});
    future
}

/// Like [`dispatch`], and invoke `callback` exactly once with the outcome.
///
/// The callback runs on the worker thread after the future is completed.
pub fn dispatch_with<C>(runner: Arc<dyn OperationRunner>, operation: Operation, callback: C) -> FutureResult
where
    C: FnOnce(&Result<HttpResponse>) + Send + 'static,
{
    let future = FutureResult::pending();
    worker::spawn(runner, operation, future.clone(), move |done| {
        if catch_unwind(AssertUnwindSafe(|| callback(done.wait()))).is_err() {
            tracing::warn!(target: "restful::concurrent", "Completion callback panicked");
        }
    });
    future
}
