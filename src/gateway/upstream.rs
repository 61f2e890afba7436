//! Wire protocol of the upstream realtime speech API.

use crate::config::UpstreamConfig;
use crate::error::{AssistantError, Result};
use crate::tools::types::{ActionResult, ToolSpec};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

pub type UpstreamSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A function call requested by the upstream model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
}

/// Open the upstream realtime session.
pub async fn connect(config: &UpstreamConfig, api_key: &str) -> Result<UpstreamSocket> {
    let mut url = url::Url::parse(&config.realtime_url).map_err(|e| {
        AssistantError::Upstream(format!("bad upstream url {}: {e}", config.realtime_url))
    })?;
    url.query_pairs_mut().append_pair("model", &config.model);
    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| AssistantError::Upstream(format!("bad upstream url {url}: {e}")))?;

    let headers = request.headers_mut();
    headers.insert(
        "Authorization",
        format!("Bearer {api_key}")
            .parse()
            .map_err(|_| AssistantError::Upstream("API key is not a valid header".to_owned()))?,
    );
    headers.insert(
        "OpenAI-Beta",
        "realtime=v1"
            .parse()
            .map_err(|_| AssistantError::Upstream("invalid beta header".to_owned()))?,
    );

    let (socket, _response) =
        tokio::time::timeout(CONNECT_TIMEOUT, tokio_tungstenite::connect_async(request))
            .await
            .map_err(|_| AssistantError::Upstream(format!("connect to {url} timed out")))?
            .map_err(|e| AssistantError::Upstream(format!("connect to {url} failed: {e}")))?;
    info!(model = %config.model, "upstream realtime session connected");
    Ok(socket)
}

/// Build the `session.update` frame configuring instructions and tools.
#[must_use]
pub fn session_update(instructions: &str, tools: &[ToolSpec]) -> String {
    let tools: Vec<Value> = tools
        .iter()
        .map(|t| {
            json!({
                "type": "function",
                "name": t.name,
                "description": t.description,
                "parameters": t.parameters,
            })
        })
        .collect();
    json!({
        "type": "session.update",
        "session": {
            "instructions": instructions,
            "voice": "ash",
            "modalities": ["text", "audio"],
            "input_audio_transcription": { "model": "whisper-1" },
            "turn_detection": { "type": "server_vad" },
            "tools": tools,
            "tool_choice": "auto",
        }
    })
    .to_string()
}

/// Parse an upstream event, extracting a completed tool call if it is one.
///
/// The upstream sends arguments as a JSON-encoded string inside the event;
/// an empty or malformed argument string degrades to `{}`.
#[must_use]
pub fn extract_tool_call(event: &str) -> Option<ToolCall> {
    let value: Value = serde_json::from_str(event).ok()?;
    if value.get("type")?.as_str()? != "response.function_call_arguments.done" {
        return None;
    }
    let call_id = value.get("call_id")?.as_str()?.to_owned();
    let name = value.get("name")?.as_str()?.to_owned();
    let arguments = value
        .get("arguments")
        .and_then(Value::as_str)
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_else(|| json!({}));
    Some(ToolCall {
        call_id,
        name,
        arguments,
    })
}

/// Frames that report a tool result back upstream: the function output item
/// followed by a `response.create` prompting the model to speak the result.
#[must_use]
pub fn function_output_frames(call_id: &str, result: &ActionResult) -> [String; 2] {
    let output = serde_json::to_string(result)
        .unwrap_or_else(|_| format!("{{\"success\":{},\"message\":\"\"}}", result.success));
    [
        json!({
            "type": "conversation.item.create",
            "item": {
                "type": "function_call_output",
                "call_id": call_id,
                "output": output,
            }
        })
        .to_string(),
        json!({ "type": "response.create" }).to_string(),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::tools::catalog::list_tools;

    #[test]
    fn session_update_carries_instructions_and_tools() {
        let frame = session_update("You are JARVIS.", &list_tools());
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "session.update");
        assert_eq!(value["session"]["instructions"], "You are JARVIS.");
        assert_eq!(value["session"]["tool_choice"], "auto");
        let tools = value["session"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), list_tools().len());
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["name"], "get_current_time");
    }

    #[test]
    fn extracts_completed_tool_call() {
        let event = json!({
            "type": "response.function_call_arguments.done",
            "call_id": "call_42",
            "name": "open_website",
            "arguments": "{\"url_or_name\":\"google\"}",
        })
        .to_string();
        let call = extract_tool_call(&event).expect("tool call");
        assert_eq!(call.call_id, "call_42");
        assert_eq!(call.name, "open_website");
        assert_eq!(call.arguments["url_or_name"], "google");
    }

    #[test]
    fn malformed_arguments_degrade_to_empty_object() {
        let event = json!({
            "type": "response.function_call_arguments.done",
            "call_id": "call_1",
            "name": "get_current_time",
            "arguments": "not json",
        })
        .to_string();
        let call = extract_tool_call(&event).expect("tool call");
        assert_eq!(call.arguments, json!({}));
    }

    #[test]
    fn other_events_are_not_tool_calls() {
        assert!(extract_tool_call(r#"{"type":"response.audio.delta"}"#).is_none());
        assert!(extract_tool_call("not json at all").is_none());
        // Right type but missing fields.
        assert!(
            extract_tool_call(r#"{"type":"response.function_call_arguments.done"}"#).is_none()
        );
    }

    #[test]
    fn function_output_frames_report_and_prompt() {
        let result = ActionResult::success("Opening Google");
        let [item, create] = function_output_frames("call_7", &result);

        let item: Value = serde_json::from_str(&item).unwrap();
        assert_eq!(item["type"], "conversation.item.create");
        assert_eq!(item["item"]["call_id"], "call_7");
        let output: Value =
            serde_json::from_str(item["item"]["output"].as_str().unwrap()).unwrap();
        assert_eq!(output["success"], true);

        let create: Value = serde_json::from_str(&create).unwrap();
        assert_eq!(create["type"], "response.create");
    }
}
