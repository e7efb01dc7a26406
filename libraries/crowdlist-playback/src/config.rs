//! Playback configuration

use crowdlist_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback controller settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Retry budget for each command
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Upper bound for `wait_for_device`
    #[serde(default = "default_device_wait_secs")]
    pub device_wait_secs: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            device_wait_secs: default_device_wait_secs(),
        }
    }
}

impl PlaybackConfig {
    pub fn device_wait(&self) -> Duration {
        Duration::from_secs(self.device_wait_secs)
    }
}

fn default_device_wait_secs() -> u64 {
    30
}
