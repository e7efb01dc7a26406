//! Types for Spotify Web API requests and responses.
//!
//! Only the fields Crowdlist reads are modelled. Every one of them is
//! required, so a response that lacks it fails to decode.

use serde::{Deserialize, Serialize};

/// Production API base URL
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Items requested per playlist page (the API maximum)
pub const PAGE_SIZE: usize = 100;

/// Configuration for the Spotify client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// Base URL of the Web API, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl SpotifyConfig {
    /// Config pointing at another API root (e.g. a mock server)
    pub fn with_api_url(url: impl Into<String>) -> Self {
        Self {
            api_url: url.into(),
            ..Self::default()
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

// =============================================================================
// Playlist Types
// =============================================================================

/// `GET /me`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

/// Body of `POST /users/{id}/playlists`
#[derive(Debug, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub public: bool,
    pub description: String,
}

/// Playlist object as returned on creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
}

/// `GET /playlists/{id}?fields=snapshot_id`, and the body of every
/// mutation response
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSnapshot {
    pub snapshot_id: String,
}

/// One page of `GET /playlists/{id}/tracks`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemsPage {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

/// A playlist entry
///
/// `track` is null for items that are no longer available.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackRef {
    pub uri: String,
}

/// Body of `PUT /playlists/{id}/tracks` for a single-item move
#[derive(Debug, Serialize)]
pub struct ReorderRequest {
    pub range_start: usize,
    pub insert_before: usize,
    pub range_length: usize,
    pub snapshot_id: String,
}

/// Body of `POST /playlists/{id}/tracks`
#[derive(Debug, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

// =============================================================================
// Player Types
// =============================================================================

/// Body of `PUT /me/player/play`
#[derive(Debug, Default, Serialize)]
pub struct PlayRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_uri: Option<String>,
}
