/// Common test utilities and fixtures
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use crowdlist_core::{
    apply_moves, DeviceId, ExternalOrder, ExternalPlaylistId, ExternalPlaylistService,
    HostSession, MoveOp, PlaybackBackend, Repository,
};
use crowdlist_playback::PlaybackConfig;
use crowdlist_server::{api, state::AppState};
use crowdlist_storage::{MemoryStore, SqliteStore};
use crowdlist_sync::SyncConfig;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_TOKEN: &str = "host-token";
pub const CREATED_EXTERNAL_ID: &str = "created-by-host";

/// Stand-in for the Spotify API: one external playlist plus a command log
#[derive(Default)]
pub struct FakeSpotify {
    uris: Mutex<Vec<String>>,
    snapshot: AtomicUsize,
    created: Mutex<Vec<String>>,
    commands: Mutex<Vec<String>>,
}

impl FakeSpotify {
    pub fn uris(&self) -> Vec<String> {
        self.uris.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn next_snapshot(&self) -> String {
        format!("snap-{}", self.snapshot.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn record(&self, device: &DeviceId, command: impl Into<String>) {
        self.commands
            .lock()
            .unwrap()
            .push(format!("{}@{device}", command.into()));
    }
}

#[async_trait]
impl ExternalPlaylistService for FakeSpotify {
    async fn fetch_order(
        &self,
        _token: &str,
        _playlist: &ExternalPlaylistId,
    ) -> crowdlist_core::Result<ExternalOrder> {
        let snapshot = format!("snap-{}", self.snapshot.load(Ordering::SeqCst));
        Ok(ExternalOrder::new(snapshot, self.uris()))
    }

    async fn move_item(
        &self,
        _token: &str,
        _playlist: &ExternalPlaylistId,
        op: MoveOp,
        _snapshot_id: &str,
    ) -> crowdlist_core::Result<String> {
        let mut uris = self.uris.lock().unwrap();
        *uris = apply_moves(uris.as_slice(), &[op])?;
        Ok(self.next_snapshot())
    }

    async fn add_tracks(
        &self,
        _token: &str,
        _playlist: &ExternalPlaylistId,
        uris: &[String],
    ) -> crowdlist_core::Result<String> {
        self.uris.lock().unwrap().extend_from_slice(uris);
        Ok(self.next_snapshot())
    }

    async fn create_playlist(
        &self,
        _token: &str,
        name: &str,
    ) -> crowdlist_core::Result<ExternalPlaylistId> {
        self.created.lock().unwrap().push(name.to_string());
        Ok(ExternalPlaylistId::new(CREATED_EXTERNAL_ID))
    }
}

#[async_trait]
impl PlaybackBackend for FakeSpotify {
    async fn play_uris(
        &self,
        _token: &str,
        device: &DeviceId,
        uris: &[String],
    ) -> crowdlist_core::Result<()> {
        self.record(device, format!("play {}", uris.join(",")));
        Ok(())
    }

    async fn play_context(
        &self,
        _token: &str,
        device: &DeviceId,
        context_uri: &str,
    ) -> crowdlist_core::Result<()> {
        self.record(device, format!("context {context_uri}"));
        Ok(())
    }

    async fn pause(&self, _token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        self.record(device, "pause");
        Ok(())
    }

    async fn resume(&self, _token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        self.record(device, "resume");
        Ok(())
    }

    async fn next(&self, _token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        self.record(device, "next");
        Ok(())
    }

    async fn previous(&self, _token: &str, device: &DeviceId) -> crowdlist_core::Result<()> {
        self.record(device, "previous");
        Ok(())
    }
}

/// A router wired to in-memory storage and a fake Spotify
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub spotify: Arc<FakeSpotify>,
}

impl TestApp {
    pub fn new(logged_in: bool) -> Self {
        Self::with_repo(Arc::new(MemoryStore::new()), logged_in)
    }

    pub fn with_repo(repo: Arc<dyn Repository>, logged_in: bool) -> Self {
        let spotify = Arc::new(FakeSpotify::default());
        let session = Arc::new(if logged_in {
            HostSession::with_token(TEST_TOKEN)
        } else {
            HostSession::new()
        });

        let state = AppState::new(
            repo,
            spotify.clone(),
            spotify.clone(),
            session,
            SyncConfig::default(),
            PlaybackConfig::default(),
        );
        let router = api::router(state.clone());

        Self {
            router,
            state,
            spotify,
        }
    }

    /// Send a request and decode the JSON body (`Null` when empty)
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Create a playlist linked to an external one and return its id
    pub async fn create_linked_playlist(&self, title: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/playlist/create",
                Some(serde_json::json!({ "title": title, "spotifyPlaylistId": "ext-1" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    /// Add a track by URI and return its internal id
    pub async fn add_track(&self, playlist_id: &str, uri: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                &format!("/api/playlist/{playlist_id}/add-track"),
                Some(serde_json::json!({ "trackId": uri })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn vote(&self, playlist_id: &str, track_id: &str, guest_id: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/api/playlist/{playlist_id}/vote"),
            Some(serde_json::json!({ "trackId": track_id, "guestId": guest_id })),
        )
        .await
    }
}

/// A migrated SQLite store in a temporary directory
pub async fn create_sqlite_store() -> Result<(Arc<SqliteStore>, TempDir)> {
    let dir = TempDir::new()?;
    let url = format!("sqlite://{}", dir.path().join("crowdlist.db").display());

    let pool = crowdlist_storage::create_pool(&url).await?;
    crowdlist_storage::run_migrations(&pool).await?;

    Ok((Arc::new(SqliteStore::new(pool)), dir))
}
