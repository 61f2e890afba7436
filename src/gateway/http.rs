//! HTTP router: REST control endpoints and WebSocket upgrades.

use crate::config::ServerConfig;
use crate::error::{AssistantError, Result};
use crate::helper::HelperClient;
use crate::state::{AssistantMode, StateHandle, StateSnapshot};
use crate::tools::{ActionExecutor, ShellOsActions, list_tools, verify_catalog};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

/// Shared handles for every request handler.
#[derive(Clone)]
pub struct AppState {
    pub state: StateHandle,
    pub executor: Arc<ActionExecutor>,
    pub config: Arc<ServerConfig>,
}

/// Build the full router.
pub fn build_router(app: AppState) -> Router {
    Router::new()
        .route("/api/jarvis/state", get(get_state))
        .route("/api/jarvis/wake", post(wake))
        .route("/api/jarvis/sleep", post(sleep))
        .route("/api/jarvis/toggle-wake-word", post(toggle_wake_word))
        .route("/api/jarvis/toggle-safety", post(toggle_safety))
        .route("/api/jarvis/mode", post(set_mode))
        .route("/api/tools", get(get_tools))
        .route("/api/test-tool", post(test_tool))
        .route("/ws", get(voice_upgrade))
        .route("/ws/state", get(state_upgrade))
        .with_state(app)
}

/// Wire up the executor and serve until stopped.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Catalog/executor parity is a startup precondition, not a runtime check.
    verify_catalog(&list_tools())?;

    let config = Arc::new(config);
    let helper = HelperClient::from_config(&config.helper);
    let executor = Arc::new(ActionExecutor::new(Arc::new(ShellOsActions::new())).with_helper(helper));
    let app = AppState {
        state: StateHandle::new(),
        executor,
        config: Arc::clone(&config),
    };

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AssistantError::Config(format!("failed to bind {addr}: {e}")))?;
    info!(addr = %addr, "gateway listening");
    axum::serve(listener, build_router(app))
        .await
        .map_err(|e| AssistantError::Channel(format!("server stopped: {e}")))
}

fn state_reply(message: &str, state: StateSnapshot) -> Json<serde_json::Value> {
    Json(json!({ "message": message, "state": state }))
}

async fn get_state(State(app): State<AppState>) -> Json<StateSnapshot> {
    Json(app.state.snapshot())
}

async fn wake(State(app): State<AppState>) -> Response {
    match app.state.wake() {
        Ok(snapshot) => state_reply("JARVIS is now awake", snapshot).into_response(),
        Err(AssistantError::State(message)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn sleep(State(app): State<AppState>) -> Json<serde_json::Value> {
    state_reply("JARVIS is now sleeping", app.state.sleep())
}

async fn toggle_wake_word(State(app): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = app.state.toggle_wake_word();
    let message = if snapshot.wake_word_enabled {
        "Wake word enabled"
    } else {
        "Wake word disabled"
    };
    state_reply(message, snapshot)
}

async fn toggle_safety(State(app): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = app.state.toggle_safety();
    let message = if snapshot.safety_enabled {
        "Safety enabled"
    } else {
        "Safety disabled"
    };
    state_reply(message, snapshot)
}

#[derive(Debug, Deserialize)]
struct ModeRequest {
    mode: String,
}

async fn set_mode(State(app): State<AppState>, Json(body): Json<ModeRequest>) -> Response {
    match AssistantMode::parse(&body.mode) {
        Some(mode) => {
            let snapshot = app.state.set_mode(mode);
            state_reply(&format!("Mode set to {}", mode.as_str()), snapshot).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unknown mode: {}", body.mode) })),
        )
            .into_response(),
    }
}

async fn get_tools() -> Json<serde_json::Value> {
    Json(json!({ "tools": list_tools() }))
}

/// Smoke-test endpoint: runs the cheapest side-effect-free action.
async fn test_tool(State(app): State<AppState>) -> Json<serde_json::Value> {
    let result = app.executor.execute("get_current_time", &json!({})).await;
    Json(json!({ "tool": "get_current_time", "result": result }))
}

async fn voice_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| super::voice::run_voice_session(socket, app))
}

async fn state_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_state_feed(socket, app.state))
}

/// Push the current snapshot on connect, then every update until the client
/// goes away.
async fn run_state_feed(socket: WebSocket, state: StateHandle) {
    let mut updates = state.subscribe();
    let (mut sink, mut source) = socket.split();

    let snapshot = state.snapshot();
    if send_snapshot(&mut sink, snapshot).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Ok(snapshot) => {
                        if send_snapshot(&mut sink, snapshot).await.is_err() {
                            break;
                        }
                    }
                    // A lagged subscriber resyncs with the current state.
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "state feed lagged, resyncing");
                        if send_snapshot(&mut sink, state.snapshot()).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = source.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }
}

async fn send_snapshot(
    sink: &mut SplitSink<WebSocket, Message>,
    snapshot: StateSnapshot,
) -> Result<()> {
    let frame = serde_json::to_string(&json!({ "type": "state_update", "state": snapshot }))
        .map_err(|e| AssistantError::Channel(format!("encode failed: {e}")))?;
    sink.send(Message::Text(frame.into()))
        .await
        .map_err(|e| AssistantError::Channel(format!("send failed: {e}")))
}
