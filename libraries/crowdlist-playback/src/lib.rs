//! Crowdlist - Playback Control
//!
//! Drives an external playback device (a Spotify Connect device) on behalf
//! of the host. Independent of voting and ranking.
//!
//! This crate provides:
//! - Device binding (at most one bound device)
//! - Play URIs, play a context or a whole playlist
//! - Pause, resume, next, previous
//! - Bounded retry of transient failures through `RetryPolicy`
//! - A cancellable, bounded wait for a device to be bound
//!
//! # Architecture
//!
//! `crowdlist-playback` owns no transport and no global state:
//! - The device API is reached through the `PlaybackBackend` port
//! - The access token comes from a `SessionProvider`
//! - Delays go through a `Clock`, so tests run without sleeping
//!
//! # Example
//!
//! ```rust,ignore
//! use crowdlist_playback::PlaybackController;
//!
//! let controller = PlaybackController::new(backend, session);
//! controller.bind_device(DeviceId::new("device-1"));
//! controller.play_playlist(None, &ExternalPlaylistId::new("37i9dQZF1DX")).await?;
//! controller.pause().await?;
//! ```

pub mod config;
pub mod controller;
pub mod error;

pub use config::PlaybackConfig;
pub use controller::{Command, PlaybackController};
pub use error::{PlaybackError, Result};
