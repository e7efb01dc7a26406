use crate::{
    config::SyncConfig,
    error::{Result, SyncError},
    types::{ReconcileReport, SyncTrigger},
};
use crowdlist_core::{
    rank, reconcile, Clock, CrowdError, ExternalPlaylistId, ExternalPlaylistService, PlaylistId,
    PlaylistStore, ReconcilePlan, Repository, SessionProvider, TokioClock, VoteStore,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Per-playlist coordination state
#[derive(Default)]
struct Slot {
    /// Held for the whole of a run
    lock: Mutex<()>,
    /// Desired order may differ from the external one
    dirty: AtomicBool,
    /// A debounced run is waiting
    scheduled: AtomicBool,
}

/// Orchestrates reconciliation of voted playlists onto the external service
pub struct SyncManager {
    repo: Arc<dyn Repository>,
    external: Arc<dyn ExternalPlaylistService>,
    session: Arc<dyn SessionProvider>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
    slots: Mutex<HashMap<PlaylistId, Arc<Slot>>>,
    /// Ends retry backoffs and the retry loop
    shutdown: CancellationToken,
}

impl SyncManager {
    pub fn new(
        repo: Arc<dyn Repository>,
        external: Arc<dyn ExternalPlaylistService>,
        session: Arc<dyn SessionProvider>,
        config: SyncConfig,
    ) -> Self {
        Self {
            repo,
            external,
            session,
            clock: Arc::new(TokioClock),
            config,
            slots: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Replace the clock used for debounce, retry delays and the retry loop
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Stop the retry loop and abort runs waiting out a retry delay
    ///
    /// Aborted runs fail with `Cancelled` and stay pending.
    pub fn shutdown(&self) {
        info!("Sync manager shutting down");
        self.shutdown.cancel();
    }

    async fn slot(&self, playlist_id: &PlaylistId) -> Arc<Slot> {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(playlist_id.clone()).or_default())
    }

    /// Mark a playlist dirty and schedule a debounced run
    ///
    /// Triggers that arrive while a run is already scheduled are absorbed by
    /// it. A trigger that arrives while a run is in progress schedules the
    /// next one.
    pub async fn trigger(self: &Arc<Self>, playlist_id: PlaylistId, reason: SyncTrigger) {
        let slot = self.slot(&playlist_id).await;
        slot.dirty.store(true, Ordering::SeqCst);

        if slot.scheduled.swap(true, Ordering::SeqCst) {
            debug!(playlist = %playlist_id, %reason, "Trigger coalesced");
            return;
        }

        debug!(playlist = %playlist_id, %reason, "Reconciliation scheduled");

        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.clock.sleep(this.config.debounce()).await;
            slot.scheduled.store(false, Ordering::SeqCst);

            if let Err(e) = this.reconcile_now(&playlist_id).await {
                warn!(playlist = %playlist_id, %reason, error = %e, "Scheduled reconciliation failed");
            }
        });
    }

    /// Reconcile one playlist now, waiting for any run in progress first
    pub async fn reconcile_now(&self, playlist_id: &PlaylistId) -> Result<ReconcileReport> {
        let slot = self.slot(playlist_id).await;
        let _running = slot.lock.lock().await;

        // Cleared before reading, so a vote landing mid-run marks it again
        slot.dirty.store(false, Ordering::SeqCst);

        match self.run(playlist_id).await {
            Ok(report) => {
                info!(
                    playlist = %playlist_id,
                    moves = report.moves_applied,
                    attempts = report.attempts,
                    missing = report.missing.len(),
                    "Reconciliation complete"
                );
                Ok(report)
            }
            Err(e) => {
                slot.dirty.store(true, Ordering::SeqCst);
                warn!(playlist = %playlist_id, error = %e, "Reconciliation failed, left pending");
                Err(e)
            }
        }
    }

    async fn run(&self, playlist_id: &PlaylistId) -> Result<ReconcileReport> {
        let playlist = self
            .repo
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| SyncError::PlaylistNotFound(playlist_id.clone()))?;

        let Some(external_id) = playlist.external_id.clone() else {
            debug!(playlist = %playlist_id, "No external playlist, nothing to reconcile");
            return Ok(ReconcileReport::skipped(playlist_id.clone()));
        };

        let token = self
            .session
            .access_token()
            .await
            .ok_or(SyncError::NotAuthenticated)?;

        let counts = self.repo.counts_for(playlist_id).await?;
        let desired = rank(playlist_id, &playlist.tracks, &counts).external_uris();

        // One refetch on conflict, then surface it
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.apply(&token, &external_id, &desired).await {
                Ok((plan, snapshot_id)) => {
                    return Ok(ReconcileReport {
                        playlist_id: playlist_id.clone(),
                        external_id: Some(external_id),
                        moves_applied: plan.moves.len(),
                        attempts,
                        missing: plan.missing,
                        unranked: plan.unranked.len(),
                        snapshot_id: Some(snapshot_id),
                    });
                }
                Err(CrowdError::Conflict(msg)) if attempts < 2 => {
                    info!(playlist = %playlist_id, reason = %msg, "Snapshot conflict, refetching");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Fetch the external order and apply the plan move by move
    ///
    /// Nothing is sent unless the fetch succeeds. Each move carries the
    /// snapshot returned by the previous one.
    async fn apply(
        &self,
        token: &str,
        external_id: &ExternalPlaylistId,
        desired: &[String],
    ) -> crowdlist_core::Result<(ReconcilePlan, String)> {
        let external = self.external.as_ref();
        let clock = self.clock.as_ref();
        let retry = &self.config.retry;
        let cancel = Some(&self.shutdown);

        let order = retry
            .run(clock, cancel, move |_| external.fetch_order(token, external_id))
            .await?;

        let plan = reconcile(desired, &order.uris);
        if !plan.missing.is_empty() {
            debug!(
                playlist = %external_id,
                missing = plan.missing.len(),
                "Ranked tracks absent from external playlist"
            );
        }

        let mut snapshot = order.snapshot_id;
        for (i, op) in plan.moves.iter().copied().enumerate() {
            let next = {
                let current = snapshot.as_str();
                retry
                    .run(clock, cancel, move |_| {
                        external.move_item(token, external_id, op, current)
                    })
                    .await?
            };
            debug!(playlist = %external_id, step = i + 1, from = op.from, to = op.to, "Move applied");
            snapshot = next;
        }

        Ok((plan, snapshot))
    }

    /// Playlists whose last run failed or that changed since
    pub async fn pending(&self) -> Vec<PlaylistId> {
        let slots = self.slots.lock().await;
        let mut ids: Vec<PlaylistId> = slots
            .iter()
            .filter(|(_, slot)| {
                slot.dirty.load(Ordering::SeqCst) && !slot.scheduled.load(Ordering::SeqCst)
            })
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Run every pending playlist once
    pub async fn retry_pending(&self) -> Vec<(PlaylistId, Result<ReconcileReport>)> {
        let pending = self.pending().await;
        let mut results = Vec::with_capacity(pending.len());

        for playlist_id in pending {
            debug!(playlist = %playlist_id, reason = %SyncTrigger::Retry, "Retrying pending playlist");
            let result = self.reconcile_now(&playlist_id).await;
            results.push((playlist_id, result));
        }

        results
    }

    /// Periodically retry pending playlists until `shutdown` is called
    pub fn spawn_retry_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            info!(
                interval_secs = this.config.retry_interval_secs,
                "Reconciliation retry loop started"
            );
            loop {
                tokio::select! {
                    () = this.shutdown.cancelled() => break,
                    () = this.clock.sleep(this.config.retry_interval()) => {
                        let results = this.retry_pending().await;
                        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
                        if !results.is_empty() {
                            info!(retried = results.len(), failed, "Retry pass finished");
                        }
                    }
                }
            }
            info!("Reconciliation retry loop stopped");
        })
    }
}
