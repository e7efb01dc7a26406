//! Votes and the values derived from them

use crate::types::{GuestId, PlaylistId, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single guest's vote for a track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub guest_id: GuestId,
}

/// Vote count per track, derived at query time
///
/// Tracks with no votes are omitted; `get` reports 0 for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteCounts(HashMap<TrackId, u32>);

impl VoteCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Votes for a track (0 when it has none)
    pub fn get(&self, track_id: &TrackId) -> u32 {
        self.0.get(track_id).copied().unwrap_or(0)
    }

    /// Record a count. Zero removes the entry so the omission rule holds.
    pub fn insert(&mut self, track_id: TrackId, count: u32) {
        if count == 0 {
            self.0.remove(&track_id);
        } else {
            self.0.insert(track_id, count);
        }
    }

    /// Number of tracks with at least one vote
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total votes across all tracks
    pub fn total(&self) -> u64 {
        self.0.values().map(|&c| u64::from(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrackId, u32)> {
        self.0.iter().map(|(id, &c)| (id, c))
    }
}

impl FromIterator<(TrackId, u32)> for VoteCounts {
    fn from_iter<I: IntoIterator<Item = (TrackId, u32)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (id, count) in iter {
            counts.insert(id, count);
        }
        counts
    }
}

/// A track with the vote count it was ranked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub votes: u32,
}

/// The track sequence implied by current vote counts
///
/// Recomputed on every query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredOrder {
    pub playlist_id: PlaylistId,
    pub tracks: Vec<RankedTrack>,
}

impl DesiredOrder {
    /// External URIs in desired order, the Reconciler's input
    pub fn external_uris(&self) -> Vec<String> {
        self.tracks
            .iter()
            .map(|r| r.track.external_uri.clone())
            .collect()
    }

    pub fn track_ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|r| r.track.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_track_counts_as_zero() {
        let counts = VoteCounts::new();
        assert_eq!(counts.get(&TrackId::new("nobody-voted")), 0);
    }

    #[test]
    fn zero_counts_are_omitted() {
        let counts: VoteCounts = vec![(TrackId::new("a"), 2), (TrackId::new("b"), 0)]
            .into_iter()
            .collect();

        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&TrackId::new("a")), 2);
        assert_eq!(counts.get(&TrackId::new("b")), 0);
        assert_eq!(counts.total(), 2);
    }
}
