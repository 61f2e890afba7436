//! Voice gateway: the HTTP/WebSocket surface of the server.
//!
//! `http` builds the router (REST control endpoints, `/ws` voice sessions,
//! `/ws/state` state feed); `voice` runs one voice session, relaying audio
//! between the browser and the upstream realtime API while intercepting tool
//! calls; `upstream` holds the upstream wire protocol.

pub mod http;
pub mod upstream;
pub mod voice;

pub use http::{AppState, build_router, run_server};
pub use upstream::ToolCall;
