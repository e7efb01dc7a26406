use crowdlist_core::{CrowdError, PlaylistId};
use thiserror::Error;

/// Errors that can occur during reconciliation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Host is not authenticated")]
    NotAuthenticated,

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// The external playlist kept changing under us
    #[error("Playlist changed during reconciliation: {0}")]
    Conflict(String),

    #[error("Sync was cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(CrowdError),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<CrowdError> for SyncError {
    fn from(err: CrowdError) -> Self {
        match err {
            CrowdError::Auth(_) => Self::NotAuthenticated,
            CrowdError::Conflict(msg) => Self::Conflict(msg),
            CrowdError::Cancelled => Self::Cancelled,
            other => Self::Core(other),
        }
    }
}

impl From<SyncError> for CrowdError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotAuthenticated => Self::auth("host is not logged in"),
            SyncError::PlaylistNotFound(id) => Self::not_found("Playlist", id.as_str()),
            SyncError::Conflict(msg) => Self::conflict(msg),
            SyncError::Cancelled => Self::Cancelled,
            SyncError::Core(err) => err,
        }
    }
}
