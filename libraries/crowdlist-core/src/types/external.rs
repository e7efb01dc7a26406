/// External playlist state as seen by the core
use serde::{Deserialize, Serialize};

/// Current order of an external playlist
///
/// `snapshot_id` identifies this exact version; updates made against a
/// stale snapshot are rejected as conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalOrder {
    pub snapshot_id: String,
    pub uris: Vec<String>,
}

impl ExternalOrder {
    pub fn new(snapshot_id: impl Into<String>, uris: Vec<String>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            uris,
        }
    }
}
