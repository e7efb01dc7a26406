//! Host session held in-process

use crate::traits::SessionProvider;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

/// Access token of the host, set and cleared explicitly
///
/// This is the one owner of the token inside a process. Consumers receive
/// it through `SessionProvider` and treat `None` as "not authenticated".
#[derive(Debug, Default)]
pub struct HostSession {
    token: RwLock<Option<String>>,
}

impl HostSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that starts with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Replace the stored token
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
        info!("Host session updated");
    }

    /// Forget the stored token
    pub async fn clear(&self) {
        *self.token.write().await = None;
        info!("Host session cleared");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }
}

#[async_trait]
impl SessionProvider for HostSession {
    async fn access_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}
