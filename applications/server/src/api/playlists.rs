/// Playlists API routes
use crate::{error::Result, error::ServerError, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crowdlist_core::{
    rank, CreatePlaylist, DesiredOrder, ExternalPlaylistId, NewTrack, Playlist, PlaylistId,
    PlaylistStore, RankedTrack, SessionProvider, Track, VoteStore,
};
use crowdlist_sync::{ReconcileReport, SyncTrigger};
use serde::{Deserialize, Serialize};

/// A playlist as guests see it: tracks in ranked order with their votes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView {
    pub id: PlaylistId,
    pub title: String,
    pub external_id: Option<ExternalPlaylistId>,
    pub tracks: Vec<RankedTrack>,
}

impl PlaylistView {
    pub fn new(playlist: Playlist, order: DesiredOrder) -> Self {
        Self {
            id: playlist.id,
            title: playlist.title,
            external_id: playlist.external_id,
            tracks: order.tracks,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub title: String,
    pub spotify_playlist_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackRequest {
    /// External URI of the track
    pub track_id: String,
    pub title: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkExternalRequest {
    pub spotify_playlist_id: Option<String>,
}

pub(crate) async fn load_playlist(app_state: &AppState, id: &PlaylistId) -> Result<Playlist> {
    app_state
        .repo
        .get_playlist(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Playlist {id}")))
}

/// Use the given external id, or create one on the host's account
async fn resolve_external(
    app_state: &AppState,
    title: &str,
    requested: Option<String>,
) -> Result<Option<ExternalPlaylistId>> {
    if let Some(id) = requested.filter(|id| !id.trim().is_empty()) {
        return Ok(Some(ExternalPlaylistId::new(id.trim())));
    }

    let Some(token) = app_state.session.access_token().await else {
        return Ok(None);
    };

    let external_id = app_state.external.create_playlist(&token, title).await?;
    tracing::info!(external = %external_id, "External playlist created");
    Ok(Some(external_id))
}

/// GET /api/playlists
/// Get all playlists, newest first
pub async fn list_playlists(State(app_state): State<AppState>) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.repo.list_playlists().await?;
    Ok(Json(playlists))
}

/// POST /api/playlist/create
/// Create a new playlist
pub async fn create_playlist(
    State(app_state): State<AppState>,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ServerError::BadRequest("title must not be empty".to_string()));
    }

    let external_id = resolve_external(&app_state, title, req.spotify_playlist_id).await?;

    let playlist = app_state
        .repo
        .create_playlist(CreatePlaylist {
            title: title.to_string(),
            external_id,
        })
        .await?;

    tracing::info!(playlist = %playlist.id, title = %playlist.title, "Playlist created");
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlist/:id
/// Get playlist with tracks in ranked order
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<PlaylistView>> {
    let playlist_id = PlaylistId::new(id);
    let playlist = load_playlist(&app_state, &playlist_id).await?;

    let counts = app_state.repo.counts_for(&playlist_id).await?;
    let order = rank(&playlist_id, &playlist.tracks, &counts);

    Ok(Json(PlaylistView::new(playlist, order)))
}

/// POST /api/playlist/:id/add-track
/// Add a track, append it externally and schedule reconciliation
pub async fn add_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    Json(req): Json<AddTrackRequest>,
) -> Result<(StatusCode, Json<Track>)> {
    let playlist_id = PlaylistId::new(id);
    let uri = req.track_id.trim();
    if uri.is_empty() {
        return Err(ServerError::BadRequest("trackId must not be empty".to_string()));
    }

    let playlist = load_playlist(&app_state, &playlist_id).await?;

    let track = app_state
        .repo
        .add_track(
            &playlist_id,
            NewTrack {
                external_uri: uri.to_string(),
                title: req.title,
                artist: req.artist,
            },
        )
        .await?;

    if let Some(external_id) = &playlist.external_id {
        match app_state.session.access_token().await {
            Some(token) => {
                // The local add stands even if the external append fails;
                // reconciliation reports the track as missing until it lands.
                if let Err(e) = app_state
                    .external
                    .add_tracks(&token, external_id, &[track.external_uri.clone()])
                    .await
                {
                    tracing::warn!(playlist = %playlist_id, error = %e, "External append failed");
                }
            }
            None => {
                tracing::warn!(playlist = %playlist_id, "No host session, track not appended externally");
            }
        }
    }

    app_state
        .sync
        .trigger(playlist_id, SyncTrigger::TrackAdded)
        .await;

    Ok((StatusCode::CREATED, Json(track)))
}

/// PUT /api/playlist/:id/external
/// Link or create the external playlist
pub async fn link_external(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    Json(req): Json<LinkExternalRequest>,
) -> Result<Json<Playlist>> {
    let playlist_id = PlaylistId::new(id);
    let playlist = load_playlist(&app_state, &playlist_id).await?;

    let external_id = resolve_external(&app_state, &playlist.title, req.spotify_playlist_id)
        .await?
        .ok_or_else(|| ServerError::Auth("Host is not logged in".to_string()))?;

    app_state
        .repo
        .set_external_id(&playlist_id, &external_id)
        .await?;
    tracing::info!(playlist = %playlist_id, external = %external_id, "External playlist linked");

    app_state
        .sync
        .trigger(playlist_id.clone(), SyncTrigger::Manual)
        .await;

    let playlist = load_playlist(&app_state, &playlist_id).await?;
    Ok(Json(playlist))
}

/// POST /api/playlist/:id/reconcile
/// Reconcile immediately
pub async fn reconcile(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<ReconcileReport>> {
    let playlist_id = PlaylistId::new(id);
    let report = app_state.sync.reconcile_now(&playlist_id).await?;
    Ok(Json(report))
}
