//! Concurrent request dispatch
//!
//! Every forked or dispatched operation runs on its own worker thread and
//! reports back through a [`FutureResult`]. The calling thread only blocks
//! when it reads an unfinished future or waits at the fork-join barrier.

pub mod dispatch;
pub mod fork_join;
pub mod future;
mod worker;

pub use dispatch::{dispatch, dispatch_with};
pub use fork_join::{Batch, ForkJoinResults, fork_join};
pub use future::FutureResult;

use crate::error::Result;
use crate::http::{HttpResponse, Operation};

/// Runs one operation to completion on the current thread
///
/// The client implements this; workers only ever see it through an `Arc`.
pub trait OperationRunner: Send + Sync {
    fn run(&self, operation: &Operation) -> Result<HttpResponse>;
}
