//! Ranker - vote counts to desired order
//!
//! Primary key is descending vote count. Ties keep the playlist's insertion
//! order, which makes the output a pure function of its inputs: the same
//! counts never produce two different orders, so the Reconciler never
//! shuffles tied tracks back and forth.

use crate::types::{DesiredOrder, PlaylistId, RankedTrack, Track, VoteCounts};
use std::cmp::Reverse;

/// Rank `tracks` (in insertion order) by `counts`
pub fn rank(playlist_id: &PlaylistId, tracks: &[Track], counts: &VoteCounts) -> DesiredOrder {
    let mut ranked: Vec<RankedTrack> = tracks
        .iter()
        .map(|track| RankedTrack {
            votes: counts.get(&track.id),
            track: track.clone(),
        })
        .collect();

    // sort_by_key is stable
    ranked.sort_by_key(|r| Reverse(r.votes));

    DesiredOrder {
        playlist_id: playlist_id.clone(),
        tracks: ranked,
    }
}
