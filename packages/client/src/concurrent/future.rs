//! Single-assignment result slot shared between a worker and its readers

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::Result;
use crate::http::HttpResponse;

/// Placeholder for the outcome of one dispatched operation.
///
/// Starts empty and is completed exactly once by the worker running the
/// operation. Clones share the same slot; any number of readers may block on
/// it or poll it, before or after completion.
#[derive(Clone)]
pub struct FutureResult {
    slot: Arc<Slot>,
}

struct Slot {
    value: OnceLock<Result<HttpResponse>>,
    lock: Mutex<()>,
    ready: Condvar,
}

impl FutureResult {
    pub(crate) fn pending() -> Self {
        Self {
            slot: Arc::new(Slot {
                value: OnceLock::new(),
                lock: Mutex::new(()),
                ready: Condvar::new(),
            }),
        }
    }

    /// A future that is already completed with `result`
    #[must_use]
    pub fn ready(result: Result<HttpResponse>) -> Self {
        let future = Self::pending();
        future.complete(result);
        future
    }

    /// Store the outcome and wake every waiting reader.
    ///
    /// Returns `false` if the future was already completed; the first outcome wins.
    pub(crate) fn complete(&self, result: Result<HttpResponse>) -> bool {
        if self.slot.value.set(result).is_err() {
            return false;
        }
        let _guard = self.slot.lock.lock();
        self.slot.ready.notify_all();
        true
    }

    /// Check whether the outcome is available without blocking
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.slot.value.get().is_some()
    }

    /// The outcome, if the operation has finished
    #[inline]
    pub fn try_get(&self) -> Option<&Result<HttpResponse>> {
        self.slot.value.get()
    }

    /// Block until the operation has finished
    pub fn wait(&self) -> &Result<HttpResponse> {
        if let Some(value) = self.slot.value.get() {
            return value;
        }

        let mut guard = self.slot.lock.lock();
        loop {
            if let Some(value) = self.slot.value.get() {
                return value;
            }
            self.slot.ready.wait(&mut guard);
        }
    }

    /// Block for at most `timeout`; `None` if the operation is still running.
    ///
    /// A timeout too large to express as a deadline waits without limit.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<&Result<HttpResponse>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.wait());
        };
        let mut guard = self.slot.lock.lock();
        loop {
            if let Some(value) = self.slot.value.get() {
                return Some(value);
            }
            if self.slot.ready.wait_until(&mut guard, deadline).timed_out() {
                return self.slot.value.get();
            }
        }
    }

    /// Block until finished and take an owned copy of the outcome
    pub fn into_result(self) -> Result<HttpResponse> {
        self.wait().clone()
    }

    /// Block until finished and return the response, if there is one
    pub fn response(&self) -> Option<&HttpResponse> {
        self.wait().as_ref().ok()
    }
}

impl fmt::Debug for FutureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot.value.get() {
            None => "pending",
            Some(Ok(_)) => "ok",
            Some(Err(_)) => "err",
        };
        f.debug_struct("FutureResult").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, Method, StatusCode};
    use url::Url;

    use super::*;

    fn ok_response() -> HttpResponse {
        let url = Url::parse("http://localhost/").unwrap();
        HttpResponse::new(Method::GET, url, StatusCode::OK, HeaderMap::new(), Bytes::from_static(b"ok"))
    }

    #[test]
    fn first_completion_wins() {
        let future = FutureResult::pending();
        assert!(!future.is_ready());
        assert!(future.complete(Ok(ok_response())));
        assert!(!future.complete(Err(crate::error::request("late"))));
        assert!(future.wait().is_ok());
    }

    #[test]
    fn readers_on_other_threads_are_woken() {
        let future = FutureResult::pending();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let future = future.clone();
                std::thread::spawn(move || future.wait().as_ref().map(|r| r.status()).ok())
            })
            .collect();

        std::thread::sleep(Duration::from_millis(20));
        future.complete(Ok(ok_response()));

        for reader in readers {
            assert_eq!(reader.join().ok().flatten(), Some(StatusCode::OK));
        }
    }

    #[test]
    fn wait_timeout_on_pending_returns_none() {
        let future = FutureResult::pending();
        assert!(future.wait_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn unbounded_wait_timeout_waits_for_completion() {
        let future = FutureResult::pending();
        let writer = future.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            writer.complete(Ok(ok_response()))
        });

        let outcome = future.wait_timeout(Duration::MAX);
        assert!(outcome.is_some_and(|r| r.is_ok()));
        assert!(handle.join().unwrap());
    }
}
