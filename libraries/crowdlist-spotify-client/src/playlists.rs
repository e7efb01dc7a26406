//! Playlist endpoints.

use crate::client::send_json;
use crate::error::{Result, SpotifyClientError};
use crate::types::{
    AddTracksRequest, CreatePlaylistRequest, CreatedPlaylist, CurrentUser, PlaylistItemsPage,
    PlaylistSnapshot, ReorderRequest, PAGE_SIZE,
};
use crowdlist_core::{ExternalOrder, ExternalPlaylistId, MoveOp};
use reqwest::Client;
use tracing::{debug, info};

/// Playlist client for the Spotify Web API.
pub struct PlaylistClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> PlaylistClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Id of the user the token belongs to.
    pub async fn current_user_id(&self) -> Result<String> {
        let url = format!("{}/me", self.base_url);
        let user: CurrentUser =
            send_json(self.http.get(&url).bearer_auth(self.access_token), false).await?;
        Ok(user.id)
    }

    /// Create a private playlist for the current user.
    pub async fn create_playlist(&self, name: &str) -> Result<ExternalPlaylistId> {
        let user_id = self.current_user_id().await?;
        let url = format!("{}/users/{}/playlists", self.base_url, user_id);

        let body = CreatePlaylistRequest {
            name: name.to_string(),
            public: false,
            description: "Ordered by votes".to_string(),
        };

        let created: CreatedPlaylist = send_json(
            self.http
                .post(&url)
                .bearer_auth(self.access_token)
                .json(&body),
            false,
        )
        .await?;

        info!(user_id = %user_id, playlist = %created.id, "Created Spotify playlist");

        Ok(ExternalPlaylistId::new(created.id))
    }

    /// Current snapshot id of a playlist.
    pub async fn snapshot_id(&self, playlist: &ExternalPlaylistId) -> Result<String> {
        let url = format!("{}/playlists/{}", self.base_url, playlist);
        let snapshot: PlaylistSnapshot = send_json(
            self.http
                .get(&url)
                .bearer_auth(self.access_token)
                .query(&[("fields", "snapshot_id")]),
            false,
        )
        .await?;
        Ok(snapshot.snapshot_id)
    }

    /// Every item URI in playlist order.
    ///
    /// Unavailable items have no URI; they get an `unavailable:<index>`
    /// placeholder so positions stay aligned with the playlist.
    pub async fn item_uris(&self, playlist: &ExternalPlaylistId) -> Result<Vec<String>> {
        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist);
        let mut uris = Vec::new();

        loop {
            let offset = uris.len();
            let page: PlaylistItemsPage = send_json(
                self.http
                    .get(&url)
                    .bearer_auth(self.access_token)
                    .query(&[
                        ("fields", "items(track(uri)),next".to_string()),
                        ("limit", PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ]),
                false,
            )
            .await?;

            let received = page.items.len();
            for (i, item) in page.items.into_iter().enumerate() {
                uris.push(
                    item.track
                        .map_or_else(|| format!("unavailable:{}", offset + i), |t| t.uri),
                );
            }

            if page.next.is_none() || received == 0 {
                break;
            }
        }

        debug!(playlist = %playlist, items = uris.len(), "Fetched playlist items");

        Ok(uris)
    }

    /// Full order plus the snapshot it belongs to.
    ///
    /// The snapshot is read before and after paging; if it moved in between,
    /// the pages may mix two versions and the fetch reports a conflict.
    pub async fn fetch_order(&self, playlist: &ExternalPlaylistId) -> Result<ExternalOrder> {
        let before = self.snapshot_id(playlist).await?;
        let uris = self.item_uris(playlist).await?;
        let after = self.snapshot_id(playlist).await?;

        if before != after {
            return Err(SpotifyClientError::SnapshotConflict(format!(
                "playlist {playlist} changed while fetching"
            )));
        }

        Ok(ExternalOrder::new(after, uris))
    }

    /// Move one item; returns the new snapshot id.
    pub async fn move_item(
        &self,
        playlist: &ExternalPlaylistId,
        op: MoveOp,
        snapshot_id: &str,
    ) -> Result<String> {
        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist);
        let body = ReorderRequest {
            range_start: op.from,
            insert_before: op.insert_before(),
            range_length: 1,
            snapshot_id: snapshot_id.to_string(),
        };

        debug!(
            playlist = %playlist,
            range_start = body.range_start,
            insert_before = body.insert_before,
            "Moving playlist item"
        );

        let snapshot: PlaylistSnapshot = send_json(
            self.http
                .put(&url)
                .bearer_auth(self.access_token)
                .json(&body),
            false,
        )
        .await?;

        Ok(snapshot.snapshot_id)
    }

    /// Append items in chunks of at most one page; returns the last
    /// snapshot id.
    pub async fn add_tracks(&self, playlist: &ExternalPlaylistId, uris: &[String]) -> Result<String> {
        if uris.is_empty() {
            return self.snapshot_id(playlist).await;
        }

        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist);
        let mut snapshot_id = String::new();

        for chunk in uris.chunks(PAGE_SIZE) {
            let body = AddTracksRequest {
                uris: chunk.to_vec(),
            };
            let snapshot: PlaylistSnapshot = send_json(
                self.http
                    .post(&url)
                    .bearer_auth(self.access_token)
                    .json(&body),
                false,
            )
            .await?;
            snapshot_id = snapshot.snapshot_id;
        }

        debug!(playlist = %playlist, added = uris.len(), "Appended playlist items");

        Ok(snapshot_id)
    }
}
