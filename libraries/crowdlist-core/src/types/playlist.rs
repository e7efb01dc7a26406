/// Playlist domain types
use crate::types::{ExternalPlaylistId, PlaylistId, Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Voted playlist
///
/// `tracks` is always in insertion order. That order is the Ranker's
/// tie-break, so storage implementations must preserve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,

    /// Playlist on the external service, once one exists
    pub external_id: Option<ExternalPlaylistId>,

    pub created_at: DateTime<Utc>,
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(title: impl Into<String>, external_id: Option<ExternalPlaylistId>) -> Self {
        Self {
            id: PlaylistId::generate(),
            title: title.into(),
            external_id,
            created_at: Utc::now(),
            tracks: Vec::new(),
        }
    }

    /// Look up a track by its internal id
    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn contains_track(&self, id: &TrackId) -> bool {
        self.track(id).is_some()
    }
}

/// Playlist creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylist {
    pub title: String,
    pub external_id: Option<ExternalPlaylistId>,
}
