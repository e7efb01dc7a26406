/// API integration tests
/// Tests complete HTTP request/response cycles against fake Spotify
mod common;

use axum::http::{Method, StatusCode};
use common::{create_sqlite_store, TestApp, CREATED_EXTERNAL_ID, TEST_TOKEN};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

// ===== Health and session =====

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(false);

    let (status, body) = app.send(Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["deviceBound"], false);
}

#[tokio::test]
async fn test_session_set_and_clear() {
    let app = TestApp::new(false);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/session",
            Some(json!({ "accessToken": TEST_TOKEN })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.send(Method::GET, "/api/health", None).await;
    assert_eq!(body["authenticated"], true);

    let (status, _) = app.send(Method::DELETE, "/api/session", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.send(Method::GET, "/api/health", None).await;
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn test_session_rejects_blank_token() {
    let app = TestApp::new(false);

    let (status, body) = app
        .send(Method::POST, "/api/session", Some(json!({ "accessToken": "  " })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// ===== Playlists =====

#[tokio::test]
async fn test_create_playlist_without_session() {
    let app = TestApp::new(false);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/playlist/create",
            Some(json!({ "title": "Friday" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Friday");
    assert!(body["externalId"].is_null());
    assert!(app.spotify.created().is_empty());
}

#[tokio::test]
async fn test_create_playlist_creates_external_with_session() {
    let app = TestApp::new(true);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/playlist/create",
            Some(json!({ "title": "Friday" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["externalId"], CREATED_EXTERNAL_ID);
    assert_eq!(app.spotify.created(), vec!["Friday"]);
}

#[tokio::test]
async fn test_create_playlist_with_given_external_id() {
    let app = TestApp::new(true);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/playlist/create",
            Some(json!({ "title": "Friday", "spotifyPlaylistId": "abc123" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["externalId"], "abc123");
    assert!(app.spotify.created().is_empty());
}

#[tokio::test]
async fn test_create_playlist_requires_title() {
    let app = TestApp::new(false);

    let (status, _) = app
        .send(Method::POST, "/api/playlist/create", Some(json!({ "title": "" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_playlists() {
    let app = TestApp::new(false);
    app.create_linked_playlist("One").await;
    app.create_linked_playlist("Two").await;

    let (status, body) = app.send(Method::GET, "/api/playlists", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_unknown_playlist() {
    let app = TestApp::new(false);

    let (status, body) = app.send(Method::GET, "/api/playlist/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_add_track_appends_externally() {
    let app = TestApp::new(true);
    let playlist = app.create_linked_playlist("Party").await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/playlist/{playlist}/add-track"),
            Some(json!({ "trackId": "spotify:track:a", "title": "Song A", "artist": "Band" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["externalUri"], "spotify:track:a");
    assert_eq!(body["title"], "Song A");
    assert_eq!(app.spotify.uris(), vec!["spotify:track:a"]);
}

#[tokio::test]
async fn test_add_track_without_session_stays_local() {
    let app = TestApp::new(false);
    let playlist = app.create_linked_playlist("Party").await;

    app.add_track(&playlist, "spotify:track:a").await;

    assert!(app.spotify.uris().is_empty());
    let (_, body) = app
        .send(Method::GET, &format!("/api/playlist/{playlist}"), None)
        .await;
    assert_eq!(body["tracks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_track_to_unknown_playlist() {
    let app = TestApp::new(true);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/playlist/missing/add-track",
            Some(json!({ "trackId": "spotify:track:a" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.spotify.uris().is_empty());
}

#[tokio::test]
async fn test_link_external_creates_playlist() {
    let app = TestApp::new(true);
    let (_, created) = app
        .send(
            Method::POST,
            "/api/playlist/create",
            Some(json!({ "title": "Later", "spotifyPlaylistId": "" })),
        )
        .await;
    // Blank id with a session still creates one
    assert_eq!(created["externalId"], CREATED_EXTERNAL_ID);

    app.state.session.clear().await;
    let (_, local) = app
        .send(
            Method::POST,
            "/api/playlist/create",
            Some(json!({ "title": "Local" })),
        )
        .await;
    let id = local["id"].as_str().unwrap();

    let (status, _) = app
        .send(Method::PUT, &format!("/api/playlist/{id}/external"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/playlist/{id}/external"),
            Some(json!({ "spotifyPlaylistId": "linked-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["externalId"], "linked-1");
}

// ===== Votes =====

#[tokio::test]
async fn test_vote_and_ranking() {
    let app = TestApp::new(false);
    let playlist = app.create_linked_playlist("Party").await;
    let a = app.add_track(&playlist, "spotify:track:a").await;
    let b = app.add_track(&playlist, "spotify:track:b").await;
    let c = app.add_track(&playlist, "spotify:track:c").await;

    let (status, body) = app.vote(&playlist, &c, "guest-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["votes"], 1);

    // Duplicate vote is a no-op
    let (_, body) = app.vote(&playlist, &c, "guest-1").await;
    assert_eq!(body["votes"], 1);

    let (_, body) = app.vote(&playlist, &c, "guest-2").await;
    assert_eq!(body["votes"], 2);
    app.vote(&playlist, &b, "guest-1").await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/playlist/{playlist}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let ranked: Vec<(&str, u64)> = body["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| (t["id"].as_str().unwrap(), t["votes"].as_u64().unwrap()))
        .collect();
    assert_eq!(ranked, vec![(c.as_str(), 2), (b.as_str(), 1), (a.as_str(), 0)]);
}

#[tokio::test]
async fn test_unvote() {
    let app = TestApp::new(false);
    let playlist = app.create_linked_playlist("Party").await;
    let a = app.add_track(&playlist, "spotify:track:a").await;

    app.vote(&playlist, &a, "guest-1").await;
    app.vote(&playlist, &a, "guest-2").await;

    let request = json!({ "trackId": a, "guestId": "guest-1" });
    let uri = format!("/api/playlist/{playlist}/vote");

    let (status, body) = app.send(Method::DELETE, &uri, Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["votes"], 1);

    // Absent vote is a no-op
    let (status, body) = app.send(Method::DELETE, &uri, Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["votes"], 1);
}

#[tokio::test]
async fn test_vote_for_unknown_track() {
    let app = TestApp::new(false);
    let playlist = app.create_linked_playlist("Party").await;

    let (status, _) = app.vote(&playlist, "not-a-track", "guest-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.vote("missing", "not-a-track", "guest-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_votes_of_guest() {
    let app = TestApp::new(false);
    let playlist = app.create_linked_playlist("Party").await;
    let a = app.add_track(&playlist, "spotify:track:a").await;
    let b = app.add_track(&playlist, "spotify:track:b").await;

    app.vote(&playlist, &b, "guest-1").await;
    app.vote(&playlist, &a, "guest-1").await;
    app.vote(&playlist, &a, "guest-2").await;

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/playlist/{playlist}/votes/guest-1"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["guestId"], "guest-1");
    assert_eq!(body["trackIds"], json!([b, a]));
}

// ===== Reconciliation =====

#[tokio::test]
async fn test_reconcile_reorders_external_playlist() {
    let app = TestApp::new(true);
    let playlist = app.create_linked_playlist("Party").await;
    app.add_track(&playlist, "spotify:track:a").await;
    app.add_track(&playlist, "spotify:track:b").await;
    let c = app.add_track(&playlist, "spotify:track:c").await;
    app.vote(&playlist, &c, "guest-1").await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/playlist/{playlist}/reconcile"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movesApplied"], 1);
    assert_eq!(body["attempts"], 1);
    assert_eq!(
        app.spotify.uris(),
        vec!["spotify:track:c", "spotify:track:a", "spotify:track:b"]
    );
}

#[tokio::test]
async fn test_reconcile_without_session() {
    let app = TestApp::new(false);
    let playlist = app.create_linked_playlist("Party").await;

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/playlist/{playlist}/reconcile"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reconcile_unknown_playlist() {
    let app = TestApp::new(true);

    let (status, _) = app
        .send(Method::POST, "/api/playlist/missing/reconcile", None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ===== Player =====

// Unbound commands wait out the device bound; paused time skips it.
#[tokio::test(start_paused = true)]
async fn test_play_without_device() {
    let app = TestApp::new(true);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/player/play",
            Some(json!({ "uri": "spotify:track:a" })),
        )
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.spotify.commands().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_play_waits_for_device_binding() {
    let app = TestApp::new(true);

    let player = Arc::clone(&app.state.player);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        player.bind_device("speaker".into());
    });

    let (status, _) = app
        .send(
            Method::POST,
            "/api/player/play",
            Some(json!({ "uri": "spotify:track:a" })),
        )
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.spotify.commands(), vec!["play spotify:track:a@speaker"]);
}

#[tokio::test(start_paused = true)]
async fn test_player_commands_go_to_bound_device() {
    let app = TestApp::new(true);

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/player/device",
            Some(json!({ "deviceId": "speaker" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.send(Method::GET, "/api/player/device", None).await;
    assert_eq!(body["deviceId"], "speaker");

    app.send(
        Method::POST,
        "/api/player/play",
        Some(json!({ "uri": "spotify:track:a" })),
    )
    .await;
    app.send(
        Method::POST,
        "/api/player/play",
        Some(json!({ "uri": "spotify:track:b", "deviceId": "phone" })),
    )
    .await;
    app.send(Method::POST, "/api/player/pause", None).await;
    app.send(Method::POST, "/api/player/resume", None).await;
    app.send(Method::POST, "/api/player/next", None).await;
    app.send(Method::POST, "/api/player/previous", None).await;

    assert_eq!(
        app.spotify.commands(),
        vec![
            "play spotify:track:a@speaker",
            "play spotify:track:b@phone",
            "pause@speaker",
            "resume@speaker",
            "next@speaker",
            "previous@speaker",
        ]
    );

    let (status, _) = app.send(Method::DELETE, "/api/player/device", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::POST, "/api/player/next", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_play_without_session() {
    let app = TestApp::new(false);
    app.state.player.bind_device("speaker".into());

    let (status, _) = app.send(Method::POST, "/api/player/pause", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_play_playlist() {
    let app = TestApp::new(true);
    app.state.player.bind_device("speaker".into());
    let linked = app.create_linked_playlist("Party").await;

    app.state.session.clear().await;
    let (_, local) = app
        .send(
            Method::POST,
            "/api/playlist/create",
            Some(json!({ "title": "Local" })),
        )
        .await;
    app.state.session.set_token(TEST_TOKEN).await;

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/player/play-playlist/{linked}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(
            Method::POST,
            &format!(
                "/api/player/play-playlist/{}",
                local["id"].as_str().unwrap()
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/player/play-context?deviceId=ignored",
            Some(json!({ "contextUri": "spotify:album:x", "deviceId": "phone" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(
        app.spotify.commands(),
        vec![
            "context spotify:playlist:ext-1@speaker",
            "context spotify:album:x@phone",
        ]
    );
}

// ===== SQLite-backed =====

#[tokio::test]
async fn test_votes_persist_in_sqlite() {
    let (store, _dir) = create_sqlite_store().await.unwrap();
    let app = TestApp::with_repo(store, false);

    let playlist = app.create_linked_playlist("Persistent").await;
    let a = app.add_track(&playlist, "spotify:track:a").await;
    let b = app.add_track(&playlist, "spotify:track:b").await;
    app.vote(&playlist, &b, "guest-1").await;

    let (_, body) = app
        .send(Method::GET, &format!("/api/playlist/{playlist}"), None)
        .await;

    let ids: Vec<&str> = body["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![b.as_str(), a.as_str()]);
}
