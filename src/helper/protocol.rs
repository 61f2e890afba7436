//! Wire protocol of the helper command channel.
//!
//! Requests are JSON text frames `{ "cmd": "...", "params": { ... } }`;
//! every request gets exactly one [`ActionResult`](crate::tools::ActionResult)
//! frame back, including parse failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One command frame sent to the helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperRequest {
    /// Command name, see [`HelperCommand`].
    pub cmd: String,
    /// Command arguments; defaults to JSON `null` when omitted.
    #[serde(default)]
    pub params: Value,
}

impl HelperRequest {
    #[must_use]
    pub fn new(cmd: impl Into<String>, params: Value) -> Self {
        Self {
            cmd: cmd.into(),
            params,
        }
    }
}

/// Commands the helper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperCommand {
    OpenApp,
    BrowserGoto,
    BrowserSearch,
    TypeText,
    ClickCenter,
    TakeScreenshot,
}

impl HelperCommand {
    pub const ALL: [Self; 6] = [
        Self::OpenApp,
        Self::BrowserGoto,
        Self::BrowserSearch,
        Self::TypeText,
        Self::ClickCenter,
        Self::TakeScreenshot,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenApp => "open_app",
            Self::BrowserGoto => "browser_goto",
            Self::BrowserSearch => "browser_search",
            Self::TypeText => "type_text",
            Self::ClickCenter => "click_center",
            Self::TakeScreenshot => "take_screenshot",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    #[test]
    fn command_names_roundtrip() {
        for cmd in HelperCommand::ALL {
            assert_eq!(HelperCommand::parse(cmd.as_str()), Some(cmd));
        }
        assert_eq!(HelperCommand::parse("self_destruct"), None);
    }

    #[test]
    fn params_default_to_null() {
        let req: HelperRequest = serde_json::from_str(r#"{"cmd":"click_center"}"#).unwrap();
        assert_eq!(req.cmd, "click_center");
        assert!(req.params.is_null());
    }

    #[test]
    fn request_serializes_cmd_and_params() {
        let req = HelperRequest::new("type_text", json!({ "text": "hello" }));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["cmd"], "type_text");
        assert_eq!(value["params"]["text"], "hello");
    }
}
