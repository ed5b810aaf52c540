//! Error types for the feederwatch engine
//!
//! Endpoint-level failures never leave the engine as errors; they are
//! absorbed into absent snapshot fields. These types exist so the absorption
//! can be logged and classified.

use thiserror::Error;

/// Broad class of an endpoint failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Timeout, connection refused, DNS resolution
    Network,
    /// Non-2xx status, malformed JSON, unreadable body
    Protocol,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

/// Errors that can occur while fetching a feeder endpoint
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request timeout
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (refused, reset, DNS)
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Any other transport error reported by the HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("unexpected status: {0}")]
    Status(u16),

    /// Body was not valid JSON
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL or endpoint path did not form a valid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classify this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout | Self::Connect(_) | Self::InvalidUrl(_) => FailureKind::Network,
            Self::Http(e) if e.is_request() => FailureKind::Network,
            Self::Http(_) | Self::Status(_) | Self::Json(_) => FailureKind::Protocol,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err)
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Http(err)
        }
    }
}
