//! Worker threads for dispatched operations

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;

use super::{FutureResult, OperationRunner};
use crate::error::{self, WorkerPanicked};
use crate::http::Operation;

const WORKER_NAME: &str = "restful-worker";

/// Run `operation` on a fresh thread and complete `future` with its outcome.
///
/// `after` runs on the worker once the future is completed. If the thread
/// cannot be spawned the future is completed with a worker error and `after`
/// runs on the calling thread instead.
pub(super) fn spawn<A>(runner: Arc<dyn OperationRunner>, operation: Operation, future: FutureResult, after: A)
where
    A: FnOnce(&FutureResult) + Send + 'static,
{
    let slot = future.clone();
    let after = Arc::new(parking_lot::Mutex::new(Some(after)));
    let worker_after = Arc::clone(&after);

    let spawned = thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| runner.run(&operation)))
                .unwrap_or_else(|_| {
                    tracing::warn!(
                        target: "restful::concurrent",
                        method = %operation.method(),
                        target_url = operation.target(),
                        "Worker panicked while running operation"
                    );
                    Err(error::worker(WorkerPanicked))
                });

            slot.complete(outcome);
            if let Some(after) = worker_after.lock().take() {
                after(&slot);
            }
        });

    if let Err(err) = spawned {
        tracing::warn!(target: "restful::concurrent", error = %err, "Failed to spawn worker thread");
        future.complete(Err(error::worker(err)));
        if let Some(after) = after.lock().take() {
            after(&future);
        }
    }
}
