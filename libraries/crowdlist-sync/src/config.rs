use crowdlist_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reconciliation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Triggers inside this window coalesce into one run
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Period of the background pass over dirty playlists
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,

    /// Retry budget for each external call
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            retry_interval_secs: default_retry_interval_secs(),
            retry: RetryPolicy::default(),
        }
    }
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}

fn default_debounce_ms() -> u64 {
    1_500
}

fn default_retry_interval_secs() -> u64 {
    30
}
