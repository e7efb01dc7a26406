use crate::{playlists, votes};
use async_trait::async_trait;
use crowdlist_core::{error::Result, types::*, PlaylistStore, VoteStore};
use sqlx::SqlitePool;
use tracing::debug;

/// Playlist and vote storage backed by `SQLite`
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl VoteStore for SqliteStore {
    async fn vote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        guest_id: &GuestId,
    ) -> Result<()> {
        let inserted = votes::vote(&self.pool, playlist_id, track_id, guest_id).await?;
        debug!(%playlist_id, %track_id, inserted, "Vote recorded");
        Ok(())
    }

    async fn unvote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        guest_id: &GuestId,
    ) -> Result<()> {
        let removed = votes::unvote(&self.pool, playlist_id, track_id, guest_id).await?;
        debug!(%playlist_id, %track_id, removed, "Vote removed");
        Ok(())
    }

    async fn counts_for(&self, playlist_id: &PlaylistId) -> Result<VoteCounts> {
        votes::counts_for(&self.pool, playlist_id).await
    }

    async fn votes_of(&self, playlist_id: &PlaylistId, guest_id: &GuestId) -> Result<Vec<TrackId>> {
        votes::votes_of(&self.pool, playlist_id, guest_id).await
    }
}

#[async_trait]
impl PlaylistStore for SqliteStore {
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        playlists::create(&self.pool, playlist).await
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_with_tracks(&self.pool, id).await
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_all(&self.pool).await
    }

    async fn add_track(&self, playlist_id: &PlaylistId, track: NewTrack) -> Result<Track> {
        playlists::add_track(&self.pool, playlist_id, track).await
    }

    async fn set_external_id(
        &self,
        playlist_id: &PlaylistId,
        external_id: &ExternalPlaylistId,
    ) -> Result<()> {
        playlists::set_external_id(&self.pool, playlist_id, external_id).await
    }
}
