//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so migrations, constraints and WAL locking behave as in production.

#![allow(dead_code)]

use crowdlist_core::{CreatePlaylist, ExternalPlaylistId, NewTrack, Playlist, PlaylistStore, Track};
use crowdlist_storage::SqliteStore;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub store: SqliteStore,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = crowdlist_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        crowdlist_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            store: SqliteStore::new(pool),
            _temp_dir: temp_dir,
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }
}

/// Test fixture: Create a playlist
pub async fn create_test_playlist(
    store: &SqliteStore,
    title: &str,
    external_id: Option<&str>,
) -> Playlist {
    store
        .create_playlist(CreatePlaylist {
            title: title.to_string(),
            external_id: external_id.map(ExternalPlaylistId::new),
        })
        .await
        .expect("Failed to create test playlist")
}

/// Test fixture: Append tracks by URI
pub async fn add_test_tracks(store: &SqliteStore, playlist: &Playlist, uris: &[&str]) -> Vec<Track> {
    let mut tracks = Vec::with_capacity(uris.len());
    for uri in uris {
        let track = store
            .add_track(&playlist.id, NewTrack::new(*uri))
            .await
            .expect("Failed to add test track");
        tracks.push(track);
    }
    tracks
}
