//! Vote Store queries
//!
//! Each mutation is a single statement against the composite primary key,
//! so concurrent voters on the same track cannot lose each other's votes.

use chrono::Utc;
use crowdlist_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

/// Record a vote; an existing vote is left untouched
pub async fn vote(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    guest_id: &GuestId,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO votes (playlist_id, track_id, guest_id, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(playlist_id, track_id, guest_id) DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(track_id)
    .bind(guest_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a vote if present
pub async fn unvote(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    guest_id: &GuestId,
) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM votes WHERE playlist_id = ? AND track_id = ? AND guest_id = ?")
            .bind(playlist_id)
            .bind(track_id)
            .bind(guest_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Vote count per track; only tracks with votes appear
pub async fn counts_for(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<VoteCounts> {
    let rows = sqlx::query(
        r#"
        SELECT track_id, COUNT(*) AS votes
        FROM votes
        WHERE playlist_id = ?
        GROUP BY track_id
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.get::<TrackId, _>("track_id"),
                row.get::<i64, _>("votes") as u32,
            )
        })
        .collect())
}

/// Tracks a guest votes for, oldest vote first
pub async fn votes_of(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    guest_id: &GuestId,
) -> Result<Vec<TrackId>> {
    let rows = sqlx::query(
        r#"
        SELECT track_id
        FROM votes
        WHERE playlist_id = ? AND guest_id = ?
        ORDER BY created_at, rowid
        "#,
    )
    .bind(playlist_id)
    .bind(guest_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.get("track_id")).collect())
}
