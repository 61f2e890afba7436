//! Core tool types: catalog entries and execution results.

use serde::{Deserialize, Serialize};

/// A catalog entry advertising one action to the voice agent.
///
/// Immutable after startup; `parameters` is a JSON-Schema-shaped object
/// describing the argument map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Outcome of one action execution. Always fully resolved before return;
/// failures are values, never thrown faults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    /// Optional structured payload (e.g. a screenshot path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ActionResult {
    /// Build a successful result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            extra: None,
        }
    }

    /// Build a failed result.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            extra: None,
        }
    }

    /// Attach one structured field to the result.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn success_and_failure_constructors() {
        let ok = ActionResult::success("done");
        assert!(ok.success);
        assert_eq!(ok.message, "done");
        assert!(ok.extra.is_none());

        let err = ActionResult::failure("broke");
        assert!(!err.success);
        assert_eq!(err.message, "broke");
    }

    #[test]
    fn extra_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&ActionResult::success("ok")).expect("serialize");
        assert!(!json.contains("extra"));
    }

    #[test]
    fn extra_roundtrips() {
        let result = ActionResult::success("saved")
            .with_extra("path", serde_json::json!("/tmp/shot.png"));
        let json = serde_json::to_string(&result).expect("serialize");
        let parsed: ActionResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, result);
        assert_eq!(
            parsed.extra.and_then(|m| m.get("path").cloned()),
            Some(serde_json::json!("/tmp/shot.png"))
        );
    }
}
