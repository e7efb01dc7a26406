//! Error types for the Spotify client.

use crowdlist_core::CrowdError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the Spotify Web API.
#[derive(Error, Debug)]
pub enum SpotifyClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Spotify is unreachable or timed out
    #[error("Spotify unreachable: {0}")]
    Unreachable(String),

    /// API returned an error response
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Access token missing, invalid or expired
    #[error("Authentication required")]
    AuthRequired,

    /// No active device for a player command
    #[error("No active playback device: {0}")]
    NoActiveDevice(String),

    /// Playlist changed since the snapshot the request was made against
    #[error("Playlist snapshot is stale: {0}")]
    SnapshotConflict(String),

    /// Rate limited by Spotify
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Response did not match the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Result type for Spotify client operations.
pub type Result<T> = std::result::Result<T, SpotifyClientError>;

impl From<SpotifyClientError> for CrowdError {
    fn from(err: SpotifyClientError) -> Self {
        match err {
            SpotifyClientError::AuthRequired => Self::auth("Spotify rejected the access token"),
            SpotifyClientError::NoActiveDevice(msg) => Self::not_ready(msg),
            SpotifyClientError::SnapshotConflict(msg) => Self::conflict(msg),
            SpotifyClientError::RateLimited { retry_after_secs } => Self::RateLimited {
                retry_after: Duration::from_secs(retry_after_secs),
            },
            SpotifyClientError::Api { status, message } if status >= 500 => {
                Self::network(format!("Spotify returned {status}: {message}"))
            }
            SpotifyClientError::Api { status, message } => {
                Self::invalid_input(format!("Spotify rejected the request ({status}): {message}"))
            }
            SpotifyClientError::InvalidUrl(msg) => Self::invalid_input(msg),
            err @ (SpotifyClientError::Request(_)
            | SpotifyClientError::Unreachable(_)
            | SpotifyClientError::ParseError(_)) => Self::network(err.to_string()),
        }
    }
}
