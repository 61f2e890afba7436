//! Helper sidecar: a separate process with screen-level privileges.
//!
//! The sidecar exposes a WebSocket command channel (keyboard/mouse
//! automation, browser control, screenshots) and an HTTP health endpoint.
//! The main server talks to it through [`HelperClient`]; keeping the two
//! processes separate means the server itself never needs accessibility or
//! screen-recording permissions.

pub mod automation;
pub mod browser;
pub mod client;
pub mod protocol;
pub mod server;
pub mod service;

pub use client::HelperClient;
pub use protocol::{HelperCommand, HelperRequest};
pub use server::{health_router, run_helper, serve_commands};
pub use service::HelperService;
