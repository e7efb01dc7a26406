//! Crowdlist Spotify Client
//!
//! HTTP client for the parts of the Spotify Web API that Crowdlist uses.
//!
//! # Features
//!
//! - **Playlists**: create, fetch order + snapshot, move one item, append
//! - **Player**: play URIs or a context, pause, resume, next, previous
//! - **Ports**: `SpotifyClient` implements `ExternalPlaylistService` and
//!   `PlaybackBackend` from `crowdlist-core`
//!
//! Every response is decoded into an explicit struct with required fields.
//! A response missing one of them is a parse error, surfaced as
//! `CrowdError::Network`.
//!
//! # Example
//!
//! ```ignore
//! use crowdlist_spotify_client::{SpotifyClient, SpotifyConfig};
//!
//! let client = SpotifyClient::new(SpotifyConfig::default())?;
//! let order = client.playlists(token).fetch_order(&playlist_id).await?;
//! println!("{} items at snapshot {}", order.uris.len(), order.snapshot_id);
//! ```

mod client;
mod error;
mod player;
mod playlists;
mod types;

// Re-export main types
pub use client::SpotifyClient;
pub use error::{Result, SpotifyClientError};
pub use types::{
    AddTracksRequest, CreatePlaylistRequest, CurrentUser, PlayRequest, PlaylistItem,
    PlaylistItemsPage, PlaylistSnapshot, ReorderRequest, SpotifyConfig, TrackRef,
    DEFAULT_API_URL, PAGE_SIZE,
};

// Re-export sub-clients for direct use if needed
pub use player::PlayerClient;
pub use playlists::PlaylistClient;
