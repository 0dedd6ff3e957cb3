//! HTTP client modules
//!
//! `core` wires configuration, the response cache, the executor and the
//! concurrent dispatch machinery into one cloneable client; `stats` keeps
//! its counters.

pub mod core;
pub mod stats;

pub use core::HttpClient;
pub use stats::{ClientStats, ClientStatsSnapshot};
