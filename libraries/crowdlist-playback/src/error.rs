//! Error types for playback control

use crowdlist_core::CrowdError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// No device bound, or the device is not active
    #[error("Playback device not ready: {0}")]
    NotReady(String),

    /// Host is not logged in
    #[error("Host is not authenticated")]
    NotAuthenticated,

    /// Transport failure that outlasted the retry budget
    #[error("Network error: {0}")]
    Network(String),

    /// The service refused the command
    #[error("Command rejected: {0}")]
    Rejected(String),

    /// Wait cancelled by its owner
    #[error("Cancelled")]
    Cancelled,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<CrowdError> for PlaybackError {
    fn from(err: CrowdError) -> Self {
        match err {
            CrowdError::Auth(_) => Self::NotAuthenticated,
            CrowdError::NotReady(msg) => Self::NotReady(msg),
            CrowdError::Network(msg) => Self::Network(msg),
            CrowdError::RateLimited { retry_after } => {
                Self::Network(format!("rate limited for {retry_after:?}"))
            }
            CrowdError::Cancelled => Self::Cancelled,
            other => Self::Rejected(other.to_string()),
        }
    }
}

impl From<PlaybackError> for CrowdError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::NotReady(msg) => Self::not_ready(msg),
            PlaybackError::NotAuthenticated => Self::auth("host is not logged in"),
            PlaybackError::Network(msg) => Self::network(msg),
            PlaybackError::Rejected(msg) => Self::invalid_input(msg),
            PlaybackError::Cancelled => Self::Cancelled,
        }
    }
}
