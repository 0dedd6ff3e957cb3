//! Fluent client builder
//!
//! Collects client configuration through method chaining and produces a
//! ready-to-use `HttpClient`.

pub mod core;
pub mod headers;
pub mod methods;

pub use core::RestBuilder;
pub use headers::{ContentType, header};
