//! Crowdlist Server Library
//!
//! Companion backend for voted playlists: guests vote over HTTP, the host's
//! session drives the external playlist and playback device.
//!
//! This library exposes the router and its components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

// Re-export commonly used types for convenience
pub use api::router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;
