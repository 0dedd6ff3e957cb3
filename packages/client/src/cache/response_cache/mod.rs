//! Response cache modules
//!
//! Bounded HTTP response cache guarded by a single reader-writer lock.
//!
//! The functionality is organized into logical modules:
//!
//! - `core`: ResponseCache struct and basic initialization
//! - `index`: entry map plus the recency and expiry orderings
//! - `operations`: lookup, insert and revalidation refresh
//! - `eviction`: size-driven eviction and expired entry cleanup
//!
//! Lookups take the shared lock; anything that links or unlinks entries takes
//! the exclusive lock, so the size ceiling holds after every insert.

pub mod core;
pub mod eviction;
pub(crate) mod index;
pub mod operations;

pub use core::ResponseCache;
pub use operations::{CacheLookup, StaleEntry};
