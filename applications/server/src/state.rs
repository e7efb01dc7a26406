/// Shared application state
use crowdlist_core::{
    ExternalPlaylistService, HostSession, PlaybackBackend, Repository, SessionProvider,
};
use crowdlist_playback::{PlaybackConfig, PlaybackController};
use crowdlist_sync::{SyncConfig, SyncManager};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub external: Arc<dyn ExternalPlaylistService>,
    pub session: Arc<HostSession>,
    pub sync: Arc<SyncManager>,
    pub player: Arc<PlaybackController>,
}

impl AppState {
    /// Wire the sync manager and playback controller around one host session
    pub fn new(
        repo: Arc<dyn Repository>,
        external: Arc<dyn ExternalPlaylistService>,
        playback: Arc<dyn PlaybackBackend>,
        session: Arc<HostSession>,
        sync_config: SyncConfig,
        playback_config: PlaybackConfig,
    ) -> Self {
        let provider: Arc<dyn SessionProvider> = session.clone();

        let sync = Arc::new(SyncManager::new(
            Arc::clone(&repo),
            Arc::clone(&external),
            Arc::clone(&provider),
            sync_config,
        ));
        let player = Arc::new(PlaybackController::with_config(
            playback,
            provider,
            playback_config,
        ));

        Self {
            repo,
            external,
            session,
            sync,
            player,
        }
    }
}
