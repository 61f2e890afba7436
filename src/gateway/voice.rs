//! One voice session: browser <-> upstream relay with tool interception.

use super::http::AppState;
use super::upstream;
use axum::extract::ws::{Message as ClientMessage, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tracing::{debug, info, warn};

/// Lifecycle of a voice session, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    Authorizing,
    Connecting,
    Streaming,
    Closed,
}

impl SessionPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Authorizing => "authorizing",
            Self::Connecting => "connecting",
            Self::Streaming => "streaming",
            Self::Closed => "closed",
        }
    }
}

/// Run one voice session to completion.
///
/// Fails fast before touching the upstream: a missing credential or an
/// engaged safety interlock produce one error frame and a close, leaving
/// session state untouched.
pub async fn run_voice_session(mut socket: WebSocket, app: AppState) {
    let session_id = uuid::Uuid::new_v4();
    info!(
        session = %session_id,
        phase = SessionPhase::Authorizing.as_str(),
        "voice session starting"
    );

    let Some(api_key) = app.config.upstream.api_key() else {
        warn!("voice session rejected: no API credential in environment");
        reject(&mut socket, "No OpenAI API key").await;
        return;
    };
    if !app.state.snapshot().safety_enabled {
        warn!("voice session rejected: safety interlock engaged");
        reject(&mut socket, "Safety switch is engaged").await;
        return;
    }

    info!(phase = SessionPhase::Connecting.as_str(), "connecting upstream");
    let upstream_socket = match upstream::connect(&app.config.upstream, &api_key).await {
        Ok(socket) => socket,
        Err(e) => {
            // The client gets a stable message; the detail stays in the log.
            warn!(error = %e, "upstream connection failed");
            reject(&mut socket, "Failed to initialize JARVIS").await;
            clear_listening(&app);
            return;
        }
    };

    let (mut up_sink, mut up_source) = upstream_socket.split();
    let (mut client_sink, mut client_source) = socket.split();

    // Configure the upstream session before any audio flows.
    let instructions = crate::persona::mode_instructions(app.state.snapshot().mode);
    let setup = upstream::session_update(&instructions, &crate::tools::list_tools());
    if let Err(e) = up_sink.send(UpstreamMessage::Text(setup)).await {
        warn!(error = %e, "failed to configure upstream session");
        let frame = json!({ "type": "error", "message": "Failed to initialize JARVIS" });
        let _ = client_sink.send(ClientMessage::Text(frame.to_string().into())).await;
        let _ = client_sink.close().await;
        clear_listening(&app);
        return;
    }

    info!(phase = SessionPhase::Streaming.as_str(), "relaying audio");
    loop {
        tokio::select! {
            client_msg = client_source.next() => {
                match client_msg {
                    Some(Ok(ClientMessage::Text(text))) => {
                        if up_sink
                            .send(UpstreamMessage::Text(text.to_string()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(ClientMessage::Binary(data))) => {
                        if up_sink
                            .send(UpstreamMessage::Binary(data.to_vec()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(ClientMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(error = %e, "client read error");
                        break;
                    }
                }
            }
            upstream_msg = up_source.next() => {
                match upstream_msg {
                    Some(Ok(UpstreamMessage::Text(text))) => {
                        // The browser sees every upstream event, tool calls
                        // included, so the UI can render activity.
                        if client_sink
                            .send(ClientMessage::Text(text.clone().into()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                        if let Some(call) = upstream::extract_tool_call(&text) {
                            info!(
                                session = %session_id,
                                tool = %call.name,
                                call_id = %call.call_id,
                                "intercepted tool call"
                            );
                            let result = app.executor.execute(&call.name, &call.arguments).await;
                            let frames =
                                upstream::function_output_frames(&call.call_id, &result);
                            let mut failed = false;
                            for frame in frames {
                                if up_sink.send(UpstreamMessage::Text(frame)).await.is_err() {
                                    failed = true;
                                    break;
                                }
                            }
                            if failed {
                                break;
                            }
                        }
                    }
                    Some(Ok(UpstreamMessage::Binary(data))) => {
                        if client_sink
                            .send(ClientMessage::Binary(data.into()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(UpstreamMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(error = %e, "upstream read error");
                        break;
                    }
                }
            }
        }
    }

    clear_listening(&app);
    let _ = up_sink.close().await;
    let _ = client_sink.close().await;
    info!(
        session = %session_id,
        phase = SessionPhase::Closed.as_str(),
        "voice session ended"
    );
}

/// The listening flag tracks the live session; every way a session ends
/// after authorization clears it.
fn clear_listening(app: &AppState) {
    if app.state.snapshot().is_listening {
        app.state.stop_listening();
    }
}

/// Send one error frame and close, without touching session state.
async fn reject(socket: &mut WebSocket, message: &str) {
    let frame = json!({ "type": "error", "message": message }).to_string();
    let _ = socket.send(ClientMessage::Text(frame.into())).await;
    let _ = socket.close().await;
}
