//! Player endpoints.
//!
//! Every command is addressed to one device via `device_id`. A 404 from
//! these endpoints means the device is not active (yet).

use crate::client::send_empty;
use crate::error::Result;
use crate::types::PlayRequest;
use crowdlist_core::DeviceId;
use reqwest::{Client, Method};
use tracing::debug;

/// Player client for the Spotify Web API.
pub struct PlayerClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> PlayerClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    async fn command(
        &self,
        method: Method,
        action: &str,
        device: &DeviceId,
        body: Option<&PlayRequest>,
    ) -> Result<()> {
        let url = format!("{}/me/player/{}", self.base_url, action);
        debug!(action, device = %device, "Player command");

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(self.access_token)
            .query(&[("device_id", device.as_str())]);

        request = match body {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_LENGTH, 0),
        };

        send_empty(request, true).await
    }

    /// Start playing the given track URIs.
    pub async fn play_uris(&self, device: &DeviceId, uris: &[String]) -> Result<()> {
        let body = PlayRequest {
            uris: Some(uris.to_vec()),
            context_uri: None,
        };
        self.command(Method::PUT, "play", device, Some(&body)).await
    }

    /// Start playing a context (playlist, album).
    pub async fn play_context(&self, device: &DeviceId, context_uri: &str) -> Result<()> {
        let body = PlayRequest {
            uris: None,
            context_uri: Some(context_uri.to_string()),
        };
        self.command(Method::PUT, "play", device, Some(&body)).await
    }

    pub async fn pause(&self, device: &DeviceId) -> Result<()> {
        self.command(Method::PUT, "pause", device, None).await
    }

    /// Resume the current context where it was paused.
    pub async fn resume(&self, device: &DeviceId) -> Result<()> {
        self.command(Method::PUT, "play", device, None).await
    }

    pub async fn next(&self, device: &DeviceId) -> Result<()> {
        self.command(Method::POST, "next", device, None).await
    }

    pub async fn previous(&self, device: &DeviceId) -> Result<()> {
        self.command(Method::POST, "previous", device, None).await
    }
}
