//! Unified error handling for the feederwatch crate
//!
//! Endpoint failures inside a fetch cycle never surface here; they are
//! absorbed into the snapshot. This type covers the operations that can
//! genuinely fail when wiring a poller: building its client and starting
//! its task.

use thiserror::Error;

pub use crate::scheduler::error::PollerError;
pub use crate::utils::error::{FailureKind, FetchError};

/// Unified error type for the feederwatch crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Poller control errors
    #[error("Poller error: {0}")]
    Poller(#[from] PollerError),
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
