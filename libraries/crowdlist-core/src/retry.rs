//! Bounded retry with exponential backoff
//!
//! Waiting goes through a [`Clock`] so tests can substitute a clock that
//! records delays instead of sleeping, and every wait can be cut short with
//! a `CancellationToken`.

use crate::error::{CrowdError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Source of delays
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time, backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry budget for a single logical operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound for any single delay
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
        }
    }
}

fn default_max_attempts() -> u32 {
    4
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

fn default_multiplier() -> u32 {
    2
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Fixed delay between a bounded number of attempts
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        let ms = delay.as_millis() as u64;
        Self {
            max_attempts,
            initial_backoff_ms: ms,
            max_backoff_ms: ms,
            multiplier: 1,
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier.max(1)).saturating_pow(attempt.saturating_sub(1));
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// when the budget runs out.
    pub async fn run<T, F, Fut>(
        &self,
        clock: &dyn Clock,
        cancel: Option<&CancellationToken>,
        mut op: F,
    ) -> Result<T>
    where
        F: FnMut(u32) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = err
                        .retry_after()
                        .map_or_else(|| self.backoff(attempt), |after| after.max(self.backoff(attempt)));

                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying after transient failure"
                    );

                    wait(clock, cancel, delay).await?;
                }
                Err(err) => {
                    debug!(attempt, error = %err, "Giving up");
                    return Err(err);
                }
            }
        }
    }
}

/// Sleep on `clock`, returning `Cancelled` if `cancel` fires first
pub async fn wait(
    clock: &dyn Clock,
    cancel: Option<&CancellationToken>,
    delay: Duration,
) -> Result<()> {
    match cancel {
        Some(token) => {
            tokio::select! {
                () = clock.sleep(delay) => Ok(()),
                () = token.cancelled() => Err(CrowdError::Cancelled),
            }
        }
        None => {
            clock.sleep(delay).await;
            Ok(())
        }
    }
}
