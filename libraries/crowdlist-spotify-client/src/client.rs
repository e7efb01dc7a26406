//! Main Spotify client.

use crate::error::{Result, SpotifyClientError};
use crate::player::PlayerClient;
use crate::playlists::PlaylistClient;
use crate::types::SpotifyConfig;
use async_trait::async_trait;
use crowdlist_core::{
    CrowdError, DeviceId, ExternalOrder, ExternalPlaylistId, ExternalPlaylistService, MoveOp,
    PlaybackBackend,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the Spotify Web API.
///
/// Holds no credentials. The caller passes the host's access token with
/// every call, so a token change never requires a new client.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
}

impl SpotifyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SpotifyConfig) -> Result<Self> {
        if config.api_url.is_empty() {
            return Err(SpotifyClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let parsed =
            Url::parse(&config.api_url).map_err(|e| SpotifyClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SpotifyClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(format!("Crowdlist/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Playlist endpoints, authenticated with `access_token`.
    pub fn playlists<'a>(&'a self, access_token: &'a str) -> PlaylistClient<'a> {
        PlaylistClient::new(&self.http, &self.base_url, access_token)
    }

    /// Player endpoints, authenticated with `access_token`.
    pub fn player<'a>(&'a self, access_token: &'a str) -> PlayerClient<'a> {
        PlayerClient::new(&self.http, &self.base_url, access_token)
    }
}

/// Turn a non-success response into a typed error.
///
/// `player` marks player endpoints, where 404 means no active device.
pub(crate) async fn error_for(response: Response, player: bool) -> SpotifyClientError {
    let status = response.status().as_u16();
    let retry_after_secs = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let message = response.text().await.unwrap_or_default();

    debug!(status, message = %message, "Spotify request failed");

    match status {
        401 => SpotifyClientError::AuthRequired,
        404 if player => SpotifyClientError::NoActiveDevice(message),
        409 | 412 => SpotifyClientError::SnapshotConflict(message),
        429 => SpotifyClientError::RateLimited {
            retry_after_secs: retry_after_secs.unwrap_or(1),
        },
        _ => SpotifyClientError::Api { status, message },
    }
}

/// Map a transport failure, separating unreachable from other errors.
pub(crate) fn transport_error(err: reqwest::Error) -> SpotifyClientError {
    if err.is_connect() || err.is_timeout() {
        SpotifyClientError::Unreachable(err.to_string())
    } else {
        SpotifyClientError::Request(err)
    }
}

/// Send a request and decode a JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder, player: bool) -> Result<T> {
    let response = request.send().await.map_err(transport_error)?;

    if !response.status().is_success() {
        return Err(error_for(response, player).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| SpotifyClientError::ParseError(e.to_string()))
}

/// Send a request whose success body is ignored.
pub(crate) async fn send_empty(request: RequestBuilder, player: bool) -> Result<()> {
    let response = request.send().await.map_err(transport_error)?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_for(response, player).await)
    }
}

#[async_trait]
impl ExternalPlaylistService for SpotifyClient {
    async fn fetch_order(
        &self,
        access_token: &str,
        playlist: &ExternalPlaylistId,
    ) -> crowdlist_core::Result<ExternalOrder> {
        Ok(self.playlists(access_token).fetch_order(playlist).await?)
    }

    async fn move_item(
        &self,
        access_token: &str,
        playlist: &ExternalPlaylistId,
        op: MoveOp,
        snapshot_id: &str,
    ) -> crowdlist_core::Result<String> {
        Ok(self
            .playlists(access_token)
            .move_item(playlist, op, snapshot_id)
            .await?)
    }

    async fn add_tracks(
        &self,
        access_token: &str,
        playlist: &ExternalPlaylistId,
        uris: &[String],
    ) -> crowdlist_core::Result<String> {
        Ok(self.playlists(access_token).add_tracks(playlist, uris).await?)
    }

    async fn create_playlist(
        &self,
        access_token: &str,
        name: &str,
    ) -> crowdlist_core::Result<ExternalPlaylistId> {
        Ok(self.playlists(access_token).create_playlist(name).await?)
    }
}

#[async_trait]
impl PlaybackBackend for SpotifyClient {
    async fn play_uris(
        &self,
        access_token: &str,
        device: &DeviceId,
        uris: &[String],
    ) -> crowdlist_core::Result<()> {
        if uris.is_empty() {
            return Err(CrowdError::invalid_input("nothing to play"));
        }
        Ok(self.player(access_token).play_uris(device, uris).await?)
    }

    async fn play_context(
        &self,
        access_token: &str,
        device: &DeviceId,
        context_uri: &str,
    ) -> crowdlist_core::Result<()> {
        Ok(self
            .player(access_token)
            .play_context(device, context_uri)
            .await?)
    }

    async fn pause(&self, access_token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        Ok(self.player(access_token).pause(device).await?)
    }

    async fn resume(&self, access_token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        Ok(self.player(access_token).resume(device).await?)
    }

    async fn next(&self, access_token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        Ok(self.player(access_token).next(device).await?)
    }

    async fn previous(&self, access_token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        Ok(self.player(access_token).previous(device).await?)
    }
}
