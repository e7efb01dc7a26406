/// Server configuration
use crate::error::{Result, ServerError};
use crowdlist_core::RetryPolicy;
use crowdlist_playback::PlaybackConfig;
use crowdlist_spotify_client::SpotifyConfig;
use crowdlist_sync::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
///
/// Read from an optional TOML file, then overridden by environment
/// variables prefixed `CROWDLIST_`, with `__` between section and key:
/// `CROWDLIST_SERVER__PORT=9000`, `CROWDLIST_STORAGE__DATABASE_URL=...`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub spotify: SpotifySettings,

    #[serde(default)]
    pub sync: SyncSettings,

    /// Retry budget shared by reconciliation and playback
    #[serde(default)]
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifySettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Upper bound when waiting for a playback device
    #[serde(default = "default_device_wait_secs")]
    pub device_wait_secs: u64,

    /// Host token to start with; normally set later via `POST /api/session`
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `config.toml` in the working directory is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        // Override with environment variables (prefixed with CROWDLIST_)
        settings = settings.add_source(
            config::Environment::with_prefix("CROWDLIST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config("Server port must not be 0".to_string()));
        }

        if self.storage.database_url.is_empty() {
            return Err(ServerError::Config(
                "Database URL is required (set CROWDLIST_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        let api_url = url::Url::parse(&self.spotify.api_url)
            .map_err(|e| ServerError::Config(format!("Invalid Spotify API URL: {e}")))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ServerError::Config(format!(
                "Spotify API URL must be http(s): {}",
                self.spotify.api_url
            )));
        }

        if self.spotify.timeout_secs == 0 || self.spotify.connect_timeout_secs == 0 {
            return Err(ServerError::Config(
                "Spotify timeouts must be at least one second".to_string(),
            ));
        }

        if self.sync.retry_interval_secs == 0 {
            return Err(ServerError::Config(
                "Sync retry interval must be at least one second".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ServerError::Config(
                "Retry policy needs at least one attempt".to_string(),
            ));
        }

        Ok(())
    }

    pub fn spotify_config(&self) -> SpotifyConfig {
        SpotifyConfig {
            api_url: self.spotify.api_url.clone(),
            timeout_secs: self.spotify.timeout_secs,
            connect_timeout_secs: self.spotify.connect_timeout_secs,
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            debounce_ms: self.sync.debounce_ms,
            retry_interval_secs: self.sync.retry_interval_secs,
            retry: self.retry.clone(),
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            retry: self.retry.clone(),
            device_wait_secs: self.spotify.device_wait_secs,
        }
    }
}

// Default values
impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for SpotifySettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            device_wait_secs: default_device_wait_secs(),
            access_token: None,
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            retry_interval_secs: default_retry_interval_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite://./data/crowdlist.db".to_string()
}

fn default_api_url() -> String {
    crowdlist_spotify_client::DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_device_wait_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    1_500
}

fn default_retry_interval_secs() -> u64 {
    30
}
