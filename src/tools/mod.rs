//! Tool catalog and action executor.
//!
//! The catalog ([`catalog::list_tools`]) advertises the action vocabulary to
//! the upstream voice agent; the executor ([`executor::ActionExecutor`])
//! routes tool calls to OS-level effects. The two tables are validated for
//! parity at startup ([`executor::verify_catalog`]).

pub mod catalog;
pub mod executor;
pub mod os;
pub mod types;

pub use catalog::list_tools;
pub use executor::{ActionExecutor, ActionKind, verify_catalog};
pub use os::{OsActions, ShellOsActions};
pub use types::{ActionResult, ToolSpec};
