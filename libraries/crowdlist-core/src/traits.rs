/// Core traits for Crowdlist
///
/// These are the seams between the pure core and the outside world:
/// persistence, the external playlist service, the playback device, and the
/// host's session. All are object safe so applications can hold them as
/// `Arc<dyn ...>`.
use crate::error::Result;
use crate::reconciler::MoveOp;
use crate::types::{
    CreatePlaylist, DeviceId, ExternalOrder, ExternalPlaylistId, GuestId, NewTrack, Playlist,
    PlaylistId, Track, TrackId, VoteCounts,
};
use async_trait::async_trait;

/// Vote Store
///
/// Implementers keep, per playlist and track, the set of guests that voted.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Record a vote. Voting twice is a no-op.
    async fn vote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        guest_id: &GuestId,
    ) -> Result<()>;

    /// Remove a vote. Removing an absent vote is a no-op.
    async fn unvote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        guest_id: &GuestId,
    ) -> Result<()>;

    /// Vote count per track; tracks without votes are omitted
    async fn counts_for(&self, playlist_id: &PlaylistId) -> Result<VoteCounts>;

    /// Tracks this guest currently votes for
    async fn votes_of(&self, playlist_id: &PlaylistId, guest_id: &GuestId) -> Result<Vec<TrackId>>;
}

/// Playlist metadata and membership
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Create a new, empty playlist
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist>;

    /// Get a playlist with its tracks in insertion order
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Get all playlists, newest first
    async fn list_playlists(&self) -> Result<Vec<Playlist>>;

    /// Append a track
    async fn add_track(&self, playlist_id: &PlaylistId, track: NewTrack) -> Result<Track>;

    /// Attach the external playlist once it exists
    async fn set_external_id(
        &self,
        playlist_id: &PlaylistId,
        external_id: &ExternalPlaylistId,
    ) -> Result<()>;
}

/// Everything the companion backend persists
pub trait Repository: VoteStore + PlaylistStore {}

impl<T: VoteStore + PlaylistStore> Repository for T {}

/// External playlist service
///
/// Treated as an opaque ordered list with snapshot versioning. Calls that
/// run against a stale snapshot fail with `CrowdError::Conflict`.
#[async_trait]
pub trait ExternalPlaylistService: Send + Sync {
    /// Fetch the full current order and its snapshot id
    async fn fetch_order(
        &self,
        access_token: &str,
        playlist: &ExternalPlaylistId,
    ) -> Result<ExternalOrder>;

    /// Move a single item; returns the new snapshot id
    async fn move_item(
        &self,
        access_token: &str,
        playlist: &ExternalPlaylistId,
        op: MoveOp,
        snapshot_id: &str,
    ) -> Result<String>;

    /// Append items; returns the new snapshot id
    async fn add_tracks(
        &self,
        access_token: &str,
        playlist: &ExternalPlaylistId,
        uris: &[String],
    ) -> Result<String>;

    /// Create a playlist owned by the host
    async fn create_playlist(&self, access_token: &str, name: &str)
        -> Result<ExternalPlaylistId>;
}

/// External playback device
#[async_trait]
pub trait PlaybackBackend: Send + Sync {
    async fn play_uris(&self, access_token: &str, device: &DeviceId, uris: &[String])
        -> Result<()>;

    async fn play_context(
        &self,
        access_token: &str,
        device: &DeviceId,
        context_uri: &str,
    ) -> Result<()>;

    async fn pause(&self, access_token: &str, device: &DeviceId) -> Result<()>;

    async fn resume(&self, access_token: &str, device: &DeviceId) -> Result<()>;

    async fn next(&self, access_token: &str, device: &DeviceId) -> Result<()>;

    async fn previous(&self, access_token: &str, device: &DeviceId) -> Result<()>;
}

/// Authenticated session
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Current access token, `None` when the host is not logged in
    async fn access_token(&self) -> Option<String>;
}
