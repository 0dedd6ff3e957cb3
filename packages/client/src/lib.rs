//! # restful client core
//!
//! Blocking HTTP client with a bounded response cache and concurrent request
//! dispatch.
//!
//! ## Features
//!
//! - **Response cache** bounded by accounted size, with TTL expiry and
//!   `ETag` / `Last-Modified` revalidation
//! - **Fork-join batches** that run every registered request on its own worker
//!   and return results in registration order
//! - **Async dispatch** returning a single-assignment `FutureResult`, with an
//!   optional completion callback
//! - **Pluggable transport** through the `RequestExecutor` trait, with a
//!   pooled hyper HTTP/1.1 executor as the default
//!
//! ## Usage
//!
//! ```no_run
//! use restful_client::{ClientConfig, HttpClient};
//!
//! let client = HttpClient::new(ClientConfig::default().with_base_url("http://localhost:8080"))?;
//!
//! let user = client.get("/user/1")?;
//! println!("{} {}", user.status(), user.text());
//!
//! let results = client.fork_join(|batch| {
//!     batch.get("/user/1");
//!     batch.post("/user", r#"{"name":"Hernan"}"#);
//! });
//! for future in &results {
//!     match future.wait() {
//!         Ok(response) => println!("{}", response.status()),
//!         Err(err) => eprintln!("{err}"),
//!     }
//! }
//! # Ok::<(), restful_client::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod cache;
pub mod client;
pub mod concurrent;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod prelude;

pub use crate::prelude::*;
