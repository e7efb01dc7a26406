/// Vote API routes
use crate::{api::playlists::load_playlist, error::Result, error::ServerError, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use crowdlist_core::{GuestId, PlaylistId, TrackId, VoteStore};
use crowdlist_sync::SyncTrigger;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub track_id: String,
    /// Opaque guest identity, taken as given
    pub guest_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub track_id: TrackId,
    pub votes: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotResponse {
    pub guest_id: GuestId,
    pub track_ids: Vec<TrackId>,
}

/// Check the track belongs to the playlist
async fn resolve(
    app_state: &AppState,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<()> {
    let playlist = load_playlist(app_state, playlist_id).await?;
    if !playlist.contains_track(track_id) {
        return Err(ServerError::NotFound(format!(
            "Track {track_id} in playlist {playlist_id}"
        )));
    }
    Ok(())
}

async fn respond(
    app_state: &AppState,
    playlist_id: PlaylistId,
    track_id: TrackId,
) -> Result<Json<VoteResponse>> {
    let votes = app_state.repo.counts_for(&playlist_id).await?.get(&track_id);

    app_state.sync.trigger(playlist_id, SyncTrigger::Vote).await;

    Ok(Json(VoteResponse { track_id, votes }))
}

/// POST /api/playlist/:id/vote
/// Vote for a track; voting twice is a no-op
pub async fn vote(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>> {
    let playlist_id = PlaylistId::new(id);
    let track_id = TrackId::new(req.track_id);
    let guest_id = GuestId::new(req.guest_id);

    resolve(&app_state, &playlist_id, &track_id).await?;
    app_state
        .repo
        .vote(&playlist_id, &track_id, &guest_id)
        .await?;
    tracing::debug!(playlist = %playlist_id, track = %track_id, guest = %guest_id, "Vote recorded");

    respond(&app_state, playlist_id, track_id).await
}

/// DELETE /api/playlist/:id/vote
/// Withdraw a vote; withdrawing an absent vote is a no-op
pub async fn unvote(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>> {
    let playlist_id = PlaylistId::new(id);
    let track_id = TrackId::new(req.track_id);
    let guest_id = GuestId::new(req.guest_id);

    resolve(&app_state, &playlist_id, &track_id).await?;
    app_state
        .repo
        .unvote(&playlist_id, &track_id, &guest_id)
        .await?;
    tracing::debug!(playlist = %playlist_id, track = %track_id, guest = %guest_id, "Vote withdrawn");

    respond(&app_state, playlist_id, track_id).await
}

/// GET /api/playlist/:id/votes/:guest_id
/// Tracks this guest currently votes for
pub async fn votes_of(
    Path((id, guest_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<Json<BallotResponse>> {
    let playlist_id = PlaylistId::new(id);
    let guest_id = GuestId::new(guest_id);

    load_playlist(&app_state, &playlist_id).await?;
    let track_ids = app_state.repo.votes_of(&playlist_id, &guest_id).await?;

    Ok(Json(BallotResponse {
        guest_id,
        track_ids,
    }))
}
