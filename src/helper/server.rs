//! Helper listeners: WebSocket command channel + HTTP health endpoint.

use super::protocol::HelperRequest;
use super::service::HelperService;
use crate::config::HelperConfig;
use crate::error::{AssistantError, Result};
use crate::tools::types::ActionResult;
use axum::{Json, Router, routing::get};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

/// Run both helper listeners until the process is stopped.
pub async fn run_helper(config: HelperConfig) -> Result<()> {
    let service = Arc::new(HelperService::new()?);

    let health_addr = format!("{}:{}", config.host, config.health_port);
    let health_listener = TcpListener::bind(&health_addr)
        .await
        .map_err(|e| AssistantError::Helper(format!("failed to bind {health_addr}: {e}")))?;
    info!(addr = %health_addr, "helper health endpoint listening");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(health_listener, health_router()).await {
            error!(error = %e, "health server stopped");
        }
    });

    let command_addr = format!("{}:{}", config.host, config.command_port);
    let listener = TcpListener::bind(&command_addr)
        .await
        .map_err(|e| AssistantError::Helper(format!("failed to bind {command_addr}: {e}")))?;
    info!(addr = %command_addr, "helper command channel listening");
    serve_commands(listener, service).await
}

/// Health endpoint router.
#[must_use]
pub fn health_router() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Accept loop for the command channel. Split out so tests can drive it
/// with a fake-backed service on an ephemeral listener.
pub async fn serve_commands(listener: TcpListener, service: Arc<HelperService>) -> Result<()> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| AssistantError::Helper(format!("accept failed: {e}")))?;
        info!(peer = %peer, "command connection accepted");
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, service).await {
                warn!(peer = %peer, error = %e, "command connection ended with error");
            }
        });
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "jarvis-helper",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// One command connection: every inbound text frame gets exactly one
/// [`ActionResult`] frame back, malformed JSON included.
async fn handle_connection(stream: TcpStream, service: Arc<HelperService>) -> Result<()> {
    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|e| AssistantError::Helper(format!("websocket handshake failed: {e}")))?;
    let (mut sink, mut source) = ws.split();

    while let Some(message) = source.next().await {
        let message = message.map_err(|e| AssistantError::Helper(format!("read failed: {e}")))?;
        match message {
            Message::Text(text) => {
                let result = match serde_json::from_str::<HelperRequest>(&text) {
                    Ok(request) => {
                        let service = Arc::clone(&service);
                        tokio::task::spawn_blocking(move || service.dispatch(&request))
                            .await
                            .unwrap_or_else(|e| {
                                ActionResult::failure(format!("Command task failed: {e}"))
                            })
                    }
                    Err(e) => ActionResult::failure(format!("Invalid request: {e}")),
                };
                let payload = serde_json::to_string(&result)
                    .map_err(|e| AssistantError::Helper(format!("encode failed: {e}")))?;
                sink.send(Message::Text(payload))
                    .await
                    .map_err(|e| AssistantError::Helper(format!("send failed: {e}")))?;
            }
            Message::Ping(data) => {
                sink.send(Message::Pong(data))
                    .await
                    .map_err(|e| AssistantError::Helper(format!("pong failed: {e}")))?;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}
