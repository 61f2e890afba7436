//! The fixed tool catalog advertised to the upstream voice agent.
//!
//! Pure and deterministic: the same ordered list on every call. Adding an
//! action requires both a catalog entry here and a matching
//! [`ActionKind`](super::executor::ActionKind) arm in the executor;
//! [`verify_catalog`](super::executor::verify_catalog) enforces the parity
//! at startup.

use super::types::ToolSpec;
use serde_json::json;

/// Ordered list of all tool specs.
#[must_use]
pub fn list_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "get_current_time",
            "Get the current time and date",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolSpec::new(
            "get_system_info",
            "Get basic system information",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolSpec::new(
            "open_application",
            "Open a desktop application (calculator, notepad, file manager, etc.)",
            json!({
                "type": "object",
                "properties": {
                    "app_name": {
                        "type": "string",
                        "description": "Name of the application to open"
                    }
                },
                "required": ["app_name"]
            }),
        ),
        ToolSpec::new(
            "open_website",
            "Open a website or web application. Use for Google, YouTube, or any website.",
            json!({
                "type": "object",
                "properties": {
                    "url_or_name": {
                        "type": "string",
                        "description": "Website name (google, youtube) or URL"
                    }
                },
                "required": ["url_or_name"]
            }),
        ),
        ToolSpec::new(
            "search_google",
            "Search Google for a specific query",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query" }
                },
                "required": ["query"]
            }),
        ),
        ToolSpec::new(
            "open_chrome",
            "Open the Google Chrome browser",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolSpec::new(
            "create_file",
            "Create a new file with optional content",
            json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "description": "Name of the file to create"
                    },
                    "content": {
                        "type": "string",
                        "description": "Content to write to the file"
                    }
                },
                "required": ["filename"]
            }),
        ),
        ToolSpec::new(
            "create_folder",
            "Create a new folder",
            json!({
                "type": "object",
                "properties": {
                    "folder_name": {
                        "type": "string",
                        "description": "Name of the folder to create"
                    }
                },
                "required": ["folder_name"]
            }),
        ),
        ToolSpec::new(
            "shutdown_system",
            "Shutdown the computer (confirm with the user first)",
            json!({
                "type": "object",
                "properties": {
                    "minutes": {
                        "type": "number",
                        "description": "Minutes to wait before shutdown (0 = now)"
                    }
                }
            }),
        ),
        ToolSpec::new(
            "restart_system",
            "Restart the computer (confirm with the user first)",
            json!({
                "type": "object",
                "properties": {
                    "minutes": {
                        "type": "number",
                        "description": "Minutes to wait before restart (0 = now)"
                    }
                }
            }),
        ),
        ToolSpec::new(
            "cancel_shutdown",
            "Cancel a pending shutdown or restart",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolSpec::new(
            "set_volume",
            "Set the system output volume level",
            json!({
                "type": "object",
                "properties": {
                    "level": {
                        "type": "number",
                        "description": "Volume level (0-100)"
                    }
                },
                "required": ["level"]
            }),
        ),
        ToolSpec::new(
            "take_screenshot",
            "Capture the full screen and save it to the Desktop",
            json!({ "type": "object", "properties": {} }),
        ),
    ]
}
