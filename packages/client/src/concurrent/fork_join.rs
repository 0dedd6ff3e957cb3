//! Fork-join request batches
//!
//! A caller-supplied build step registers operations on a [`Batch`]. Once it
//! returns, every operation is forked onto its own worker and the calling
//! thread waits at a counting barrier until all of them have completed.

use std::ops::Index;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use crossbeam_utils::sync::WaitGroup;

use super::{FutureResult, OperationRunner, worker};
use crate::http::Operation;

/// Registration context for one fork-join call
#[derive(Debug, Default)]
pub struct Batch {
    operations: Vec<(Operation, FutureResult)>,
}

impl Batch {
    fn new() -> Self {
        Self::default()
    }

    /// Register an operation; its future completes once the batch has run
    pub fn register(&mut self, operation: Operation) -> FutureResult {
        let future = FutureResult::pending();
        self.operations.push((operation, future.clone()));
        future
    }

    pub fn get(&mut self, target: impl Into<String>) -> FutureResult {
        self.register(Operation::get(target))
    }

    pub fn post(&mut self, target: impl Into<String>, body: impl Into<Bytes>) -> FutureResult {
        self.register(Operation::post(target, body))
    }

    pub fn put(&mut self, target: impl Into<String>, body: impl Into<Bytes>) -> FutureResult {
        self.register(Operation::put(target, body))
    }

    pub fn patch(&mut self, target: impl Into<String>, body: impl Into<Bytes>) -> FutureResult {
        self.register(Operation::patch(target, body))
    }

    pub fn delete(&mut self, target: impl Into<String>) -> FutureResult {
        self.register(Operation::delete(target))
    }

    pub fn head(&mut self, target: impl Into<String>) -> FutureResult {
        self.register(Operation::head(target))
    }

    pub fn options(&mut self, target: impl Into<String>) -> FutureResult {
        self.register(Operation::options(target))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Completed futures of one batch, in registration order
#[derive(Debug, Clone, Default)]
pub struct ForkJoinResults {
    futures: Vec<FutureResult>,
}

impl ForkJoinResults {
    #[inline]
    pub fn len(&self) -> usize {
        self.futures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FutureResult> {
        self.futures.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FutureResult> {
        self.futures.iter()
    }

    /// Number of operations that ended in an error
    pub fn failures(&self) -> usize {
        self.futures.iter().filter(|f| f.wait().is_err()).count()
    }
}

impl Index<usize> for ForkJoinResults {
    type Output = FutureResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.futures[index]
    }
}

impl IntoIterator for ForkJoinResults {
    type Item = FutureResult;
    type IntoIter = std::vec::IntoIter<FutureResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.futures.into_iter()
    }
}

impl<'a> IntoIterator for &'a ForkJoinResults {
    type Item = &'a FutureResult;
    type IntoIter = std::slice::Iter<'a, FutureResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.futures.iter()
    }
}

/// Run `build`, fork every registered operation and wait for all of them.
///
/// A failed operation only affects its own future; siblings keep running and
/// the barrier still waits for every one of them.
pub fn fork_join<F>(runner: Arc<dyn OperationRunner>, build: F) -> ForkJoinResults
where
    F: FnOnce(&mut Batch),
{
    let mut batch = Batch::new();
    build(&mut batch);

    let started = Instant::now();
    let count = batch.len();
    let barrier = WaitGroup::new();
    let mut futures = Vec::with_capacity(count);

    for (operation, future) in batch.operations {
        futures.push(future.clone());
        let arrived = barrier.clone();
        worker::spawn(Arc::clone(&runner), operation, future, move |_| drop(arrived));
    }

    barrier.wait();

    tracing::debug!(
        target: "restful::concurrent",
        operations = count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fork-join batch completed"
    );

    ForkJoinResults { futures }
}
