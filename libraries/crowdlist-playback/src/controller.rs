//! Playback controller
//!
//! The bound device lives in a `watch` channel. Commands issued while no
//! device is bound wait for a binding made from another task, up to the
//! configured bound.

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crowdlist_core::{
    Clock, DeviceId, ExternalPlaylistId, PlaybackBackend, SessionProvider, TokioClock,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A command sent to the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    PlayUris(Vec<String>),
    PlayContext(String),
    Pause,
    Resume,
    Next,
    Previous,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayUris(uris) => write!(f, "play {} uri(s)", uris.len()),
            Self::PlayContext(uri) => write!(f, "play context {uri}"),
            Self::Pause => write!(f, "pause"),
            Self::Resume => write!(f, "resume"),
            Self::Next => write!(f, "next"),
            Self::Previous => write!(f, "previous"),
        }
    }
}

/// Issues playback commands against an external device
///
/// Owns its backend, session and clock handles. The only state is the bound
/// device; "bound" means `Some`.
pub struct PlaybackController {
    backend: Arc<dyn PlaybackBackend>,
    session: Arc<dyn SessionProvider>,
    clock: Arc<dyn Clock>,
    config: PlaybackConfig,
    device: watch::Sender<Option<DeviceId>>,
    shutdown: CancellationToken,
}

impl PlaybackController {
    /// Controller with default config and real time
    pub fn new(backend: Arc<dyn PlaybackBackend>, session: Arc<dyn SessionProvider>) -> Self {
        Self::with_config(backend, session, PlaybackConfig::default())
    }

    pub fn with_config(
        backend: Arc<dyn PlaybackBackend>,
        session: Arc<dyn SessionProvider>,
        config: PlaybackConfig,
    ) -> Self {
        let (device, _) = watch::channel(None);
        Self {
            backend,
            session,
            clock: Arc::new(TokioClock),
            config,
            device,
            shutdown: CancellationToken::new(),
        }
    }

    /// Replace the clock used for retry delays and device waits
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Device binding =====

    /// Bind the device that commands go to
    pub fn bind_device(&self, device: DeviceId) {
        info!(device = %device, "Playback device bound");
        self.device.send_replace(Some(device));
    }

    /// Forget the bound device
    pub fn unbind_device(&self) {
        if self.device.send_replace(None).is_some() {
            info!("Playback device unbound");
        }
    }

    pub fn is_device_bound(&self) -> bool {
        self.device.borrow().is_some()
    }

    pub fn bound_device(&self) -> Option<DeviceId> {
        self.device.borrow().clone()
    }

    /// Abort commands still waiting for a device
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait until a device is bound
    ///
    /// Returns immediately if one already is. Gives up with `NotReady` after
    /// the configured bound, or with `Cancelled` when `cancel` fires.
    pub async fn wait_for_device(&self, cancel: &CancellationToken) -> Result<DeviceId> {
        let mut rx = self.device.subscribe();

        let bound = async {
            loop {
                let current = rx.borrow_and_update().clone();
                if let Some(device) = current {
                    return Ok(device);
                }
                if rx.changed().await.is_err() {
                    return Err(PlaybackError::NotReady("controller shut down".into()));
                }
            }
        };

        tokio::select! {
            result = bound => result,
            () = self.clock.sleep(self.config.device_wait()) => {
                warn!(wait_secs = self.config.device_wait_secs, "No playback device bound in time");
                Err(PlaybackError::NotReady(format!(
                    "no device bound within {}s",
                    self.config.device_wait_secs
                )))
            }
            () = cancel.cancelled() => Err(PlaybackError::Cancelled),
        }
    }

    // ===== Commands =====

    /// Play a single track URI
    pub async fn play(&self, device: Option<&DeviceId>, uri: &str) -> Result<()> {
        self.execute(device, Command::PlayUris(vec![uri.to_string()]))
            .await
    }

    /// Play a context (playlist or album URI)
    pub async fn play_context(&self, device: Option<&DeviceId>, context_uri: &str) -> Result<()> {
        self.execute(device, Command::PlayContext(context_uri.to_string()))
            .await
    }

    /// Play a whole external playlist from the top
    pub async fn play_playlist(
        &self,
        device: Option<&DeviceId>,
        playlist: &ExternalPlaylistId,
    ) -> Result<()> {
        self.execute(device, Command::PlayContext(playlist.context_uri()))
            .await
    }

    pub async fn pause(&self) -> Result<()> {
        self.execute(None, Command::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.execute(None, Command::Resume).await
    }

    pub async fn next(&self) -> Result<()> {
        self.execute(None, Command::Next).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.execute(None, Command::Previous).await
    }

    /// Resolve device and token, then send `command` under the retry policy
    ///
    /// An explicit `device` overrides the bound one for this call only. With
    /// neither, waits for a binding as `wait_for_device` does.
    pub async fn execute(&self, device: Option<&DeviceId>, command: Command) -> Result<()> {
        let device = match device {
            Some(device) => device.clone(),
            None => {
                if !self.is_device_bound() {
                    debug!(command = %command, "Waiting for a playback device");
                }
                self.wait_for_device(&self.shutdown).await?
            }
        };

        let token = self
            .session
            .access_token()
            .await
            .ok_or(PlaybackError::NotAuthenticated)?;

        debug!(device = %device, command = %command, "Sending playback command");

        let (token, device, command) = (token.as_str(), &device, &command);
        self.config
            .retry
            .run(self.clock.as_ref(), Some(&self.shutdown), move |_| {
                self.dispatch(token, device, command)
            })
            .await
            .map_err(|err| {
                warn!(command = %command, error = %err, "Playback command failed");
                PlaybackError::from(err)
            })
    }

    async fn dispatch(
        &self,
        token: &str,
        device: &DeviceId,
        command: &Command,
    ) -> crowdlist_core::Result<()> {
        match command {
            Command::PlayUris(uris) => self.backend.play_uris(token, device, uris).await,
            Command::PlayContext(uri) => self.backend.play_context(token, device, uri).await,
            Command::Pause => self.backend.pause(token, device).await,
            Command::Resume => self.backend.resume(token, device).await,
            Command::Next => self.backend.next(token, device).await,
            Command::Previous => self.backend.previous(token, device).await,
        }
    }
}
