/// Core error types for Crowdlist
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `CrowdError`
pub type Result<T> = std::result::Result<T, CrowdError>;

/// Core error type for Crowdlist
///
/// Every crate-local error converts into one of these kinds, so callers can
/// decide between "retry", "ask the host to log in" and "give up" without
/// knowing which layer failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrowdError {
    /// Missing or expired access token
    #[error("Not authenticated: {0}")]
    Auth(String),

    /// Transient transport failure, or a response that did not match its schema
    #[error("Network error: {0}")]
    Network(String),

    /// The external service asked us to slow down
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Playback device is not connected yet
    #[error("Playback device not ready: {0}")]
    NotReady(String),

    /// External playlist changed between fetch and update
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A wait or retry loop was cancelled by its owner
    #[error("Operation cancelled")]
    Cancelled,
}

impl CrowdError {
    /// Create an auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a not-ready error
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether a bounded retry may succeed where this attempt failed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited { .. } | Self::NotReady(_)
        )
    }

    /// Minimum delay requested by the remote side, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for CrowdError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_kinds_are_retryable() {
        assert!(CrowdError::network("reset").is_retryable());
        assert!(CrowdError::not_ready("no device").is_retryable());
        assert!(CrowdError::RateLimited {
            retry_after: Duration::from_secs(2)
        }
        .is_retryable());
    }

    #[test]
    fn terminal_kinds_are_not_retryable() {
        assert!(!CrowdError::auth("expired").is_retryable());
        assert!(!CrowdError::conflict("snapshot").is_retryable());
        assert!(!CrowdError::storage("disk full").is_retryable());
        assert!(!CrowdError::not_found("Playlist", "p1").is_retryable());
        assert!(!CrowdError::Cancelled.is_retryable());
    }

    #[test]
    fn rate_limit_exposes_retry_after() {
        let err = CrowdError::RateLimited {
            retry_after: Duration::from_secs(3),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
        assert_eq!(CrowdError::network("x").retry_after(), None);
    }

    #[test]
    fn not_found_display() {
        let err = CrowdError::not_found("Playlist", "abc");
        assert_eq!(err.to_string(), "Playlist not found: abc");
    }
}
