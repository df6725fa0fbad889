//! Error types used throughout the client
//!
//! Provides the API error taxonomy and the failure classification every
//! wrapped operation resolves through.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for Flock client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Classification of a remote failure.
///
/// Every error an executed operation can surface maps onto exactly one of
/// these kinds. `NotFound` is the only kind that may be converted into an
/// absent value, and only when the caller opted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The addressed resource does not exist (HTTP 404)
    NotFound,
    /// Any other classified remote/protocol failure
    Api,
    /// Anything that does not match a known remote failure shape
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Api => write!(f, "api"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the failure classification for this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Auth(_)
            | Self::RateLimit(_)
            | Self::Server(_)
            | Self::Client(_)
            | Self::Network(_)
            | Self::Timeout(_) => FailureKind::Api,
            Self::InvalidInput(_) | Self::Cancelled | Self::Internal(_) => FailureKind::Unexpected,
        }
    }

    /// Check whether this error is the remote "resource absent" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Fold a correlation id into the error message so propagated failures
    /// stay traceable across log systems.
    ///
    /// Variants without a message payload are returned unchanged; an id that
    /// is already present is not appended twice.
    pub fn with_correlation(self, correlation_id: &str) -> Self {
        if correlation_id.is_empty() {
            return self;
        }
        match self {
            Self::NotFound(msg) => Self::NotFound(annotate(msg, correlation_id)),
            Self::Auth(msg) => Self::Auth(annotate(msg, correlation_id)),
            Self::RateLimit(msg) => Self::RateLimit(annotate(msg, correlation_id)),
            Self::Server(msg) => Self::Server(annotate(msg, correlation_id)),
            Self::Client(msg) => Self::Client(annotate(msg, correlation_id)),
            Self::Network(msg) => Self::Network(annotate(msg, correlation_id)),
            Self::InvalidInput(msg) => Self::InvalidInput(annotate(msg, correlation_id)),
            Self::Internal(msg) => Self::Internal(annotate(msg, correlation_id)),
            other @ (Self::Timeout(_) | Self::Cancelled) => other,
        }
    }
}

fn annotate(msg: String, correlation_id: &str) -> String {
    if msg.contains("correlation_id=") {
        msg
    } else {
        format!("{} (correlation_id={})", msg, correlation_id)
    }
}
