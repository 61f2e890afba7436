//! JARVIS: a voice-controlled desktop assistant.
//!
//! Two processes cooperate:
//!
//! - **jarvis-server** — the gateway. Serves the REST control surface and
//!   `/ws/state` feed, and relays `/ws` voice sessions to the upstream
//!   realtime speech API, intercepting tool calls and executing them
//!   locally through the [`tools`] executor.
//! - **jarvis-helper** — a sidecar with screen-level privileges. Exposes a
//!   WebSocket command channel for keyboard/mouse automation, browser
//!   control, and screenshots, plus an HTTP health endpoint.
//!
//! Session state (awake/listening/wake-word/safety/mode) lives in
//! [`state::StateHandle`]; the safety interlock gates both the wake
//! transition and new voice sessions.

pub mod config;
pub mod error;
pub mod gateway;
pub mod helper;
pub mod persona;
pub mod state;
pub mod tools;

pub use config::ServerConfig;
pub use error::{AssistantError, Result};
pub use gateway::{AppState, build_router, run_server};
pub use helper::{HelperClient, run_helper};
pub use state::{AssistantMode, StateHandle, StateSnapshot};
pub use tools::{ActionExecutor, ActionResult, ToolSpec, list_tools, verify_catalog};
