//! In-memory store
//!
//! Holds the same data as the `SQLite` tables. Every mutation takes the one
//! write guard, which serializes concurrent vote/unvote on any key.

use async_trait::async_trait;
use crowdlist_core::{error::Result, types::*, CrowdError, PlaylistStore, VoteStore};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    /// Creation order
    playlists: Vec<Playlist>,
    /// playlist -> track -> guests, plus per-guest insertion order
    votes: HashMap<PlaylistId, HashMap<TrackId, HashSet<GuestId>>>,
    ballots: HashMap<(PlaylistId, GuestId), Vec<TrackId>>,
}

impl State {
    fn playlist_mut(&mut self, id: &PlaylistId) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CrowdError::not_found("Playlist", id.as_str()))
    }
}

/// Playlist and vote storage kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn vote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        guest_id: &GuestId,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let inserted = state
            .votes
            .entry(playlist_id.clone())
            .or_default()
            .entry(track_id.clone())
            .or_default()
            .insert(guest_id.clone());

        if inserted {
            state
                .ballots
                .entry((playlist_id.clone(), guest_id.clone()))
                .or_default()
                .push(track_id.clone());
        }
        Ok(())
    }

    async fn unvote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        guest_id: &GuestId,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let removed = state
            .votes
            .get_mut(playlist_id)
            .and_then(|tracks| tracks.get_mut(track_id))
            .is_some_and(|guests| guests.remove(guest_id));

        if removed {
            if let Some(ballot) = state
                .ballots
                .get_mut(&(playlist_id.clone(), guest_id.clone()))
            {
                ballot.retain(|t| t != track_id);
            }
        }
        Ok(())
    }

    async fn counts_for(&self, playlist_id: &PlaylistId) -> Result<VoteCounts> {
        let state = self.state.read().await;
        Ok(state
            .votes
            .get(playlist_id)
            .map(|tracks| {
                tracks
                    .iter()
                    .map(|(track, guests)| (track.clone(), guests.len() as u32))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn votes_of(&self, playlist_id: &PlaylistId, guest_id: &GuestId) -> Result<Vec<TrackId>> {
        let state = self.state.read().await;
        Ok(state
            .ballots
            .get(&(playlist_id.clone(), guest_id.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl PlaylistStore for MemoryStore {
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        let created = Playlist::new(playlist.title, playlist.external_id);
        self.state.write().await.playlists.push(created.clone());
        Ok(created)
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        let state = self.state.read().await;
        Ok(state.playlists.iter().find(|p| &p.id == id).cloned())
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let state = self.state.read().await;
        Ok(state.playlists.iter().rev().cloned().collect())
    }

    async fn add_track(&self, playlist_id: &PlaylistId, track: NewTrack) -> Result<Track> {
        let mut state = self.state.write().await;
        let playlist = state.playlist_mut(playlist_id)?;
        let added = Track::from_new(track);
        playlist.tracks.push(added.clone());
        Ok(added)
    }

    async fn set_external_id(
        &self,
        playlist_id: &PlaylistId,
        external_id: &ExternalPlaylistId,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.playlist_mut(playlist_id)?.external_id = Some(external_id.clone());
        Ok(())
    }
}
