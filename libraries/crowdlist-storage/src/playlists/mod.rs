use chrono::{DateTime, Utc};
use crowdlist_core::{error::Result, types::*, CrowdError};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        title: row.get("title"),
        external_id: row.get("external_id"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        tracks: Vec::new(),
    }
}

fn track_from_row(row: &SqliteRow) -> Track {
    Track {
        id: row.get("track_id"),
        external_uri: row.get("external_uri"),
        title: row.get("title"),
        artist: row.get("artist"),
        added_at: row.get::<DateTime<Utc>, _>("added_at"),
    }
}

/// Get playlist metadata without tracks
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, external_id, created_at
        FROM playlists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(playlist_from_row))
}

/// Get a playlist with its tracks in insertion order
pub async fn get_with_tracks(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let Some(mut playlist) = get_by_id(pool, id).await? else {
        return Ok(None);
    };

    playlist.tracks = get_tracks(pool, id).await?;

    Ok(Some(playlist))
}

/// Tracks of a playlist in insertion order
pub async fn get_tracks(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<Track>> {
    let rows = sqlx::query(
        r#"
        SELECT track_id, external_uri, title, artist, added_at
        FROM playlist_tracks
        WHERE playlist_id = ?
        ORDER BY position
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(track_from_row).collect())
}

/// All playlists, newest first, each with its tracks
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, external_id, created_at
        FROM playlists
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut playlists: Vec<Playlist> = rows.iter().map(playlist_from_row).collect();
    for playlist in &mut playlists {
        playlist.tracks = get_tracks(pool, &playlist.id).await?;
    }

    Ok(playlists)
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let created = Playlist::new(playlist.title, playlist.external_id);

    sqlx::query(
        r#"
        INSERT INTO playlists (id, title, external_id, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&created.id)
    .bind(&created.title)
    .bind(&created.external_id)
    .bind(created.created_at)
    .execute(pool)
    .await?;

    Ok(created)
}

/// Append a track at the next free position
///
/// Position lookup and insert run as one statement so concurrent adds take
/// the write lock up front instead of upgrading a read transaction.
pub async fn add_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track: NewTrack,
) -> Result<Track> {
    let added = Track::from_new(track);

    let result = sqlx::query(
        r#"
        INSERT INTO playlist_tracks
            (track_id, playlist_id, external_uri, title, artist, position, added_at)
        SELECT ?, p.id, ?, ?, ?,
            (SELECT COALESCE(MAX(t.position) + 1, 0)
             FROM playlist_tracks t
             WHERE t.playlist_id = p.id),
            ?
        FROM playlists p
        WHERE p.id = ?
        "#,
    )
    .bind(&added.id)
    .bind(&added.external_uri)
    .bind(&added.title)
    .bind(&added.artist)
    .bind(added.added_at)
    .bind(playlist_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CrowdError::not_found("Playlist", playlist_id.as_str()));
    }

    Ok(added)
}

/// Attach the external playlist id
pub async fn set_external_id(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    external_id: &ExternalPlaylistId,
) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET external_id = ? WHERE id = ?")
        .bind(external_id)
        .bind(playlist_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CrowdError::not_found("Playlist", playlist_id.as_str()));
    }

    Ok(())
}
