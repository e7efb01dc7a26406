/// Playback API routes
use crate::{api::playlists::load_playlist, error::Result, error::ServerError, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use crowdlist_core::{DeviceId, PlaylistId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindDeviceRequest {
    pub device_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub device_id: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    pub uri: String,
    /// Overrides the bound device for this call
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayContextRequest {
    pub context_uri: String,
    pub device_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceQuery {
    pub device_id: Option<String>,
}

fn device_override(device_id: Option<String>) -> Option<DeviceId> {
    device_id
        .filter(|id| !id.trim().is_empty())
        .map(DeviceId::new)
}

/// GET /api/player/device
pub async fn get_device(State(app_state): State<AppState>) -> Json<DeviceResponse> {
    Json(DeviceResponse {
        device_id: app_state.player.bound_device(),
    })
}

/// PUT /api/player/device
/// Bind the device playback commands go to
pub async fn bind_device(
    State(app_state): State<AppState>,
    Json(req): Json<BindDeviceRequest>,
) -> Result<StatusCode> {
    let device_id = req.device_id.trim();
    if device_id.is_empty() {
        return Err(ServerError::BadRequest(
            "deviceId must not be empty".to_string(),
        ));
    }

    app_state.player.bind_device(DeviceId::new(device_id));
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/player/device
pub async fn unbind_device(State(app_state): State<AppState>) -> StatusCode {
    app_state.player.unbind_device();
    StatusCode::NO_CONTENT
}

/// POST /api/player/play
pub async fn play(
    State(app_state): State<AppState>,
    Json(req): Json<PlayRequest>,
) -> Result<StatusCode> {
    let device = device_override(req.device_id);
    app_state.player.play(device.as_ref(), &req.uri).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/player/play-context
pub async fn play_context(
    State(app_state): State<AppState>,
    Json(req): Json<PlayContextRequest>,
) -> Result<StatusCode> {
    let device = device_override(req.device_id);
    app_state
        .player
        .play_context(device.as_ref(), &req.context_uri)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/player/play-playlist/:id
/// Play a voted playlist's external counterpart from the top
pub async fn play_playlist(
    Path(id): Path<String>,
    Query(query): Query<DeviceQuery>,
    State(app_state): State<AppState>,
) -> Result<StatusCode> {
    let playlist_id = PlaylistId::new(id);
    let playlist = load_playlist(&app_state, &playlist_id).await?;

    let external_id = playlist.external_id.ok_or_else(|| {
        ServerError::BadRequest(format!("Playlist {playlist_id} has no external playlist"))
    })?;

    let device = device_override(query.device_id);
    app_state
        .player
        .play_playlist(device.as_ref(), &external_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/player/pause
pub async fn pause(State(app_state): State<AppState>) -> Result<StatusCode> {
    app_state.player.pause().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/player/resume
pub async fn resume(State(app_state): State<AppState>) -> Result<StatusCode> {
    app_state.player.resume().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/player/next
pub async fn next(State(app_state): State<AppState>) -> Result<StatusCode> {
    app_state.player.next().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/player/previous
pub async fn previous(State(app_state): State<AppState>) -> Result<StatusCode> {
    app_state.player.previous().await?;
    Ok(StatusCode::NO_CONTENT)
}
