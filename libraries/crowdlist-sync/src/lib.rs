//! Crowdlist Sync
//!
//! Keeps external playlists in the order the votes ask for.
//!
//! A trigger (vote, added track, explicit request) marks a playlist dirty
//! and schedules one debounced run. A run ranks the tracks, fetches the
//! external order, plans the minimal moves and applies them one by one
//! against the snapshot each move returns. Runs of the same playlist never
//! overlap. A run that fails leaves the playlist dirty; the retry loop or
//! the next trigger starts over from a fresh fetch.

mod config;
mod error;
mod manager;
mod types;

// Public exports
pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use manager::SyncManager;
pub use types::{ReconcileReport, SyncTrigger};
