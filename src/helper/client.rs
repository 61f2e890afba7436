//! Client side of the helper command channel, used by the main server.

use super::protocol::HelperRequest;
use crate::config::HelperConfig;
use crate::error::{AssistantError, Result};
use crate::tools::types::ActionResult;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the helper sidecar over its WebSocket command channel.
///
/// Connects per command: commands are rare (one per tool call) and a fresh
/// connection means a restarted helper is picked up without reconnect logic.
#[derive(Debug, Clone)]
pub struct HelperClient {
    url: String,
}

impl HelperClient {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn from_config(config: &HelperConfig) -> Self {
        Self::new(config.command_url())
    }

    /// Send one command and wait for its result.
    pub async fn execute(&self, cmd: &str, params: Value) -> Result<ActionResult> {
        tokio::time::timeout(COMMAND_TIMEOUT, self.execute_inner(cmd, params))
            .await
            .map_err(|_| AssistantError::Helper(format!("helper command '{cmd}' timed out")))?
    }

    async fn execute_inner(&self, cmd: &str, params: Value) -> Result<ActionResult> {
        debug!(url = %self.url, cmd, "sending helper command");
        let (ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| {
                AssistantError::Helper(format!("failed to connect to helper at {}: {e}", self.url))
            })?;
        let (mut sink, mut source) = ws.split();

        let request = HelperRequest::new(cmd, params);
        let payload = serde_json::to_string(&request)
            .map_err(|e| AssistantError::Helper(format!("encode failed: {e}")))?;
        sink.send(Message::Text(payload))
            .await
            .map_err(|e| AssistantError::Helper(format!("send failed: {e}")))?;

        while let Some(message) = source.next().await {
            let message =
                message.map_err(|e| AssistantError::Helper(format!("read failed: {e}")))?;
            if let Message::Text(text) = message {
                return serde_json::from_str(&text).map_err(|e| {
                    AssistantError::Helper(format!("malformed helper response: {e}"))
                });
            }
        }
        Err(AssistantError::Helper(
            "helper closed the connection without responding".to_owned(),
        ))
    }
}
