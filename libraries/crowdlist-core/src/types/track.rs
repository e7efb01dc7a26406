/// Track domain type
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A track as it sits in a voted playlist
///
/// Tracks are created when added and never mutated afterwards. The same
/// external URI may appear more than once in a playlist; each add gets its
/// own `TrackId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Internal identifier, the key guests vote on
    pub id: TrackId,

    /// External service URI (e.g. `spotify:track:...`)
    pub external_uri: String,

    /// Display title (opaque to ranking)
    pub title: Option<String>,

    /// Display artist (opaque to ranking)
    pub artist: Option<String>,

    /// When the track was added to the playlist
    pub added_at: DateTime<Utc>,
}

impl Track {
    /// Create a new track with a generated id and no display metadata
    pub fn new(external_uri: impl Into<String>) -> Self {
        Self {
            id: TrackId::generate(),
            external_uri: external_uri.into(),
            title: None,
            artist: None,
            added_at: Utc::now(),
        }
    }

    /// Create a track from a `NewTrack` request
    pub fn from_new(track: NewTrack) -> Self {
        Self {
            id: TrackId::generate(),
            external_uri: track.external_uri,
            title: track.title,
            artist: track.artist,
            added_at: Utc::now(),
        }
    }
}

/// Track to add to a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrack {
    pub external_uri: String,
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl NewTrack {
    pub fn new(external_uri: impl Into<String>) -> Self {
        Self {
            external_uri: external_uri.into(),
            title: None,
            artist: None,
        }
    }
}
