use crowdlist_core::{ExternalPlaylistId, PlaylistId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a reconciliation was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    Vote,
    TrackAdded,
    Manual,
    Retry,
}

impl fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vote => "vote",
            Self::TrackAdded => "track_added",
            Self::Manual => "manual",
            Self::Retry => "retry",
        };
        f.write_str(s)
    }
}

/// Outcome of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub playlist_id: PlaylistId,
    pub external_id: Option<ExternalPlaylistId>,

    /// Moves sent to the external service
    pub moves_applied: usize,

    /// Fetch-and-apply passes; more than one means a conflict was retried
    pub attempts: u32,

    /// Ranked URIs the external playlist does not contain
    pub missing: Vec<String>,

    /// External items without a ranked counterpart
    pub unranked: usize,

    /// Snapshot after the last move
    pub snapshot_id: Option<String>,
}

impl ReconcileReport {
    /// Report for a playlist that has no external counterpart yet
    pub fn skipped(playlist_id: PlaylistId) -> Self {
        Self {
            playlist_id,
            external_id: None,
            moves_applied: 0,
            attempts: 0,
            missing: Vec::new(),
            unranked: 0,
            snapshot_id: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.external_id.is_none()
    }
}
