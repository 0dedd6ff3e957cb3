pub mod classification;
pub mod constructors;
pub mod helpers;
pub mod types;

pub use constructors::*;
pub use helpers::{BadScheme, TimedOut, WorkerPanicked};
pub use types::{Error, Kind, Result};

// Type alias for compatibility with the facade crate
pub type HttpError = Error;
