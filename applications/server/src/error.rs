/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crowdlist_core::CrowdError;
use crowdlist_playback::PlaybackError;
use crowdlist_sync::SyncError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Playback device not ready: {0}")]
    NotReady(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The external service failed or could not be reached
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CrowdError> for ServerError {
    fn from(err: CrowdError) -> Self {
        match err {
            CrowdError::Auth(msg) => Self::Auth(msg),
            CrowdError::NotFound { entity, id } => Self::NotFound(format!("{entity} {id}")),
            CrowdError::InvalidInput(msg) => Self::BadRequest(msg),
            CrowdError::NotReady(msg) => Self::NotReady(msg),
            CrowdError::Conflict(msg) => Self::Conflict(msg),
            CrowdError::Network(msg) => Self::Upstream(msg),
            err @ CrowdError::RateLimited { .. } => Self::Upstream(err.to_string()),
            CrowdError::Storage(msg) => Self::Storage(msg),
            CrowdError::Cancelled => Self::NotReady("server is shutting down".to_string()),
        }
    }
}

impl From<SyncError> for ServerError {
    fn from(err: SyncError) -> Self {
        CrowdError::from(err).into()
    }
}

impl From<PlaybackError> for ServerError {
    fn from(err: PlaybackError) -> Self {
        // Rejected commands surface as InvalidInput, hence 400
        CrowdError::from(err).into()
    }
}

impl From<crowdlist_storage::StorageError> for ServerError {
    fn from(err: crowdlist_storage::StorageError) -> Self {
        // StorageError -> CrowdError -> ServerError
        CrowdError::from(err).into()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::NotReady(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::Upstream(ref msg) => {
                tracing::warn!("Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream service error".to_string())
            }
            ServerError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
