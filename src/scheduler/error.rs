//! Error types for the scheduler module

use std::time::Duration;
use thiserror::Error;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, PollerError>;

/// Errors returned by poller control operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollerError {
    /// Refresh interval must be non-zero
    #[error("Invalid refresh interval {interval:?}: must be greater than zero")]
    InvalidInterval { interval: Duration },

    /// Base URL could not be used for a feeder
    #[error("Invalid feeder URL: {reason}")]
    InvalidBaseUrl { reason: String },

    /// Poller task is no longer running
    #[error("Poller has stopped")]
    Stopped,
}

impl PollerError {
    /// Create an invalid base URL error
    pub fn invalid_base_url(reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            reason: reason.into(),
        }
    }
}
