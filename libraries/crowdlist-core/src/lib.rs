//! Crowdlist Core
//!
//! Platform-agnostic core types, traits, and algorithms for Crowdlist.
//!
//! This crate owns everything that decides *what* a voted playlist should
//! look like, and nothing that talks to the network or a database.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `VoteCounts`, `DesiredOrder`
//! - **Ranker**: vote counts + insertion order → deterministic desired order
//! - **Reconciler**: desired order vs. external order → minimal move list
//! - **Ports**: `VoteStore`, `PlaylistStore`, `ExternalPlaylistService`,
//!   `PlaybackBackend`, `SessionProvider`, `Clock`
//! - **Error Handling**: unified `CrowdError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use crowdlist_core::{rank, reconcile, apply_moves};
//! use crowdlist_core::types::{PlaylistId, Track, TrackId, VoteCounts};
//!
//! let playlist_id = PlaylistId::new("party");
//! let a = Track::new("spotify:track:a");
//! let b = Track::new("spotify:track:b");
//! let c = Track::new("spotify:track:c");
//!
//! let mut counts = VoteCounts::default();
//! counts.insert(c.id.clone(), 3);
//!
//! let desired = rank(&playlist_id, &[a, b, c], &counts);
//! let current = vec!["spotify:track:a", "spotify:track:b", "spotify:track:c"];
//! let plan = reconcile(&desired.external_uris(), &current);
//!
//! assert_eq!(plan.moves.len(), 1);
//! let reordered = apply_moves(&current, &plan.moves).unwrap();
//! assert_eq!(reordered, vec!["spotify:track:c", "spotify:track:a", "spotify:track:b"]);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod ranker;
pub mod reconciler;
pub mod retry;
pub mod session;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CrowdError, Result};
pub use ranker::rank;
pub use reconciler::{apply_moves, reconcile, MoveOp, ReconcilePlan};
pub use retry::{Clock, RetryPolicy, TokioClock};
pub use session::HostSession;
pub use traits::{
    ExternalPlaylistService, PlaybackBackend, PlaylistStore, Repository, SessionProvider,
    VoteStore,
};

pub use types::{
    CreatePlaylist, DesiredOrder, DeviceId, ExternalOrder, ExternalPlaylistId, GuestId, NewTrack,
    Playlist, PlaylistId, RankedTrack, Track, TrackId, Vote, VoteCounts,
};
