//! Chat trait definition

use async_trait::async_trait;
use tracing::{debug, error};

use super::ChatError;

/// Single-turn chat - each call is independent (no conversation state)
#[async_trait]
pub trait Chat: Send + Sync {
    /// Send one prompt and return the reply text, or why there is none
    async fn try_send(&self, prompt: &str) -> Result<String, ChatError>;

    /// Best-effort variant of [`Chat::try_send`]
    ///
    /// Every failure is logged once at error level and collapses to `None`,
    /// so callers cannot tell a network failure from a malformed reply.
    async fn send(&self, prompt: &str) -> Option<String> {
        debug!(prompt_len = prompt.len(), "send: called");
        match self.try_send(prompt).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                error!(error = %e, transport = e.is_transport(), "Chat request failed");
                None
            }
        }
    }
}
