/// Host session API routes
use crate::{error::Result, error::ServerError, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub access_token: String,
}

/// POST /api/session
/// Store the host's access token
///
/// Playlists whose reconciliation failed for lack of a token are retried
/// in the background.
pub async fn set_session(
    State(app_state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<StatusCode> {
    let token = req.access_token.trim();
    if token.is_empty() {
        return Err(ServerError::BadRequest(
            "accessToken must not be empty".to_string(),
        ));
    }

    app_state.session.set_token(token).await;
    tracing::info!("Host session set");

    let sync = app_state.sync.clone();
    tokio::spawn(async move {
        sync.retry_pending().await;
    });

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/session
/// Forget the host's access token
pub async fn clear_session(State(app_state): State<AppState>) -> StatusCode {
    app_state.session.clear().await;
    tracing::info!("Host session cleared");
    StatusCode::NO_CONTENT
}
