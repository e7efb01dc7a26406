//! Integration tests for the playlists vertical slice
//!
//! Tests playlist operations including:
//! - Create / get / list
//! - Track insertion order, duplicate URIs
//! - External id attachment
//! - Not-found handling

mod test_helpers;

use crowdlist_core::{
    CrowdError, ExternalPlaylistId, NewTrack, PlaylistId, PlaylistStore,
};
use std::collections::HashSet;
use std::sync::Arc;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let playlist = create_test_playlist(store, "Friday Night", Some("ext-42")).await;
    assert_eq!(playlist.title, "Friday Night");
    assert_eq!(playlist.external_id, Some(ExternalPlaylistId::new("ext-42")));

    let retrieved = store.get_playlist(&playlist.id).await.unwrap().unwrap();
    assert_eq!(retrieved.id, playlist.id);
    assert_eq!(retrieved.title, "Friday Night");
    assert_eq!(retrieved.external_id, playlist.external_id);
    assert!(retrieved.tracks.is_empty());
}

#[tokio::test]
async fn test_get_unknown_playlist_returns_none() {
    let test_db = TestDb::new().await;
    let found = test_db
        .store()
        .get_playlist(&PlaylistId::new("missing"))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_tracks_keep_insertion_order() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let playlist = create_test_playlist(store, "Order", None).await;
    let added = add_test_tracks(
        store,
        &playlist,
        &["spotify:track:c", "spotify:track:a", "spotify:track:b"],
    )
    .await;

    let retrieved = store.get_playlist(&playlist.id).await.unwrap().unwrap();
    let ids: Vec<_> = retrieved.tracks.iter().map(|t| t.id.clone()).collect();
    let expected: Vec<_> = added.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_same_uri_added_twice_is_two_tracks() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let playlist = create_test_playlist(store, "Dupes", None).await;
    let added = add_test_tracks(store, &playlist, &["spotify:track:a", "spotify:track:a"]).await;
    assert_ne!(added[0].id, added[1].id);

    let retrieved = store.get_playlist(&playlist.id).await.unwrap().unwrap();
    assert_eq!(retrieved.tracks.len(), 2);
}

#[tokio::test]
async fn test_track_metadata_round_trips() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let playlist = create_test_playlist(store, "Meta", None).await;
    store
        .add_track(
            &playlist.id,
            NewTrack {
                external_uri: "spotify:track:x".into(),
                title: Some("Song".into()),
                artist: Some("Band".into()),
            },
        )
        .await
        .unwrap();

    let retrieved = store.get_playlist(&playlist.id).await.unwrap().unwrap();
    assert_eq!(retrieved.tracks[0].title.as_deref(), Some("Song"));
    assert_eq!(retrieved.tracks[0].artist.as_deref(), Some("Band"));
}

#[tokio::test]
async fn test_add_track_to_unknown_playlist() {
    let test_db = TestDb::new().await;
    let err = test_db
        .store()
        .add_track(&PlaylistId::new("missing"), NewTrack::new("spotify:track:a"))
        .await
        .unwrap_err();

    assert!(matches!(err, CrowdError::NotFound { .. }));
}

#[tokio::test]
async fn test_set_external_id() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let playlist = create_test_playlist(store, "Later", None).await;
    store
        .set_external_id(&playlist.id, &ExternalPlaylistId::new("ext-7"))
        .await
        .unwrap();

    let retrieved = store.get_playlist(&playlist.id).await.unwrap().unwrap();
    assert_eq!(retrieved.external_id, Some(ExternalPlaylistId::new("ext-7")));

    let err = store
        .set_external_id(&PlaylistId::new("missing"), &ExternalPlaylistId::new("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, CrowdError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_playlists_includes_tracks() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let first = create_test_playlist(store, "First", None).await;
    let second = create_test_playlist(store, "Second", None).await;
    add_test_tracks(store, &first, &["spotify:track:a"]).await;

    let all = store.list_playlists().await.unwrap();
    assert_eq!(all.len(), 2);

    let first_loaded = all.iter().find(|p| p.id == first.id).unwrap();
    let second_loaded = all.iter().find(|p| p.id == second.id).unwrap();
    assert_eq!(first_loaded.tracks.len(), 1);
    assert!(second_loaded.tracks.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_keep_every_track() {
    let test_db = TestDb::new().await;
    let store = Arc::new(test_db.store().clone());

    let playlist = create_test_playlist(&store, "Rush", None).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = Arc::clone(&store);
            let playlist_id = playlist.id.clone();
            tokio::spawn(async move {
                store
                    .add_track(&playlist_id, NewTrack::new(format!("spotify:track:{i}")))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let retrieved = store.get_playlist(&playlist.id).await.unwrap().unwrap();
    assert_eq!(retrieved.tracks.len(), 20);

    let uris: HashSet<_> = retrieved
        .tracks
        .iter()
        .map(|t| t.external_uri.clone())
        .collect();
    let expected: HashSet<_> = (0..20).map(|i| format!("spotify:track:{i}")).collect();
    assert_eq!(uris, expected);
}
