//! Round-trip tests of the helper command channel with fake backends.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use futures_util::{SinkExt, StreamExt};
use jarvis::helper::automation::AutomationBackend;
use jarvis::helper::browser::BrowserControl;
use jarvis::helper::{HelperClient, HelperService, health_router, serve_commands};
use jarvis::tools::{ActionResult, OsActions};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

struct FakeAutomation {
    typed: Arc<Mutex<Vec<String>>>,
}

impl AutomationBackend for FakeAutomation {
    fn name(&self) -> &'static str {
        "fake"
    }
    fn is_available(&self) -> bool {
        true
    }
    fn type_text(&self, text: &str) -> Result<(), String> {
        self.typed.lock().unwrap().push(text.to_owned());
        Ok(())
    }
    fn click_center(&self) -> Result<(), String> {
        Ok(())
    }
    fn screenshot(&self, path: &Path) -> Result<(), String> {
        std::fs::write(path, b"png").map_err(|e| e.to_string())
    }
}

struct FakeBrowser;

impl BrowserControl for FakeBrowser {
    fn goto(&self, url: &str) -> Result<String, String> {
        Ok(format!("Opened {url}"))
    }
    fn search(&self, query: &str) -> Result<String, String> {
        Ok(format!("Searching for {query}"))
    }
}

struct NoopOs;

impl OsActions for NoopOs {
    fn open_url(&self, _url: &str) -> Result<(), String> {
        Ok(())
    }
    fn open_app(&self, _command: &str) -> Result<(), String> {
        Ok(())
    }
    fn create_file(&self, _path: &str, _content: &str) -> Result<(), String> {
        Ok(())
    }
    fn create_folder(&self, _path: &str) -> Result<(), String> {
        Ok(())
    }
    fn schedule_shutdown(&self, _minutes: u64, _restart: bool) -> Result<(), String> {
        Ok(())
    }
    fn cancel_shutdown(&self) -> Result<(), String> {
        Ok(())
    }
    fn set_volume(&self, _level: u8) -> Result<(), String> {
        Ok(())
    }
    fn system_info(&self) -> Result<String, String> {
        Ok("TestOS".to_owned())
    }
}

/// Spawn a command channel backed by fakes, returning its URL, the
/// typed-text recorder, and the screenshot directory (kept alive by the
/// caller).
async fn spawn_helper() -> (String, Arc<Mutex<Vec<String>>>, tempfile::TempDir) {
    let typed = Arc::new(Mutex::new(Vec::new()));
    let shots = tempfile::tempdir().expect("tempdir");
    let service = Arc::new(
        HelperService::with_parts(
            Box::new(FakeAutomation {
                typed: Arc::clone(&typed),
            }),
            Box::new(FakeBrowser),
            Arc::new(NoopOs),
        )
        .with_screenshot_dir(shots.path()),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        serve_commands(listener, service).await.expect("serve");
    });
    (format!("ws://127.0.0.1:{}", addr.port()), typed, shots)
}

#[tokio::test]
async fn unknown_command_round_trips_as_failure() {
    let (url, _typed, _shots) = spawn_helper().await;
    let client = HelperClient::new(url);

    let result = client.execute("levitate", json!({})).await.expect("round trip");
    assert!(!result.success);
    assert_eq!(result.message, "Unknown command: levitate");
}

#[tokio::test]
async fn type_text_round_trips() {
    let (url, typed, _shots) = spawn_helper().await;
    let client = HelperClient::new(url);

    let result = client
        .execute("type_text", json!({ "text": "good evening" }))
        .await
        .expect("round trip");
    assert!(result.success);
    assert_eq!(result.message, "Typed 12 characters");
    assert_eq!(typed.lock().unwrap().clone(), vec!["good evening"]);
}

#[tokio::test]
async fn screenshot_round_trips_with_path() {
    let (url, _typed, shots) = spawn_helper().await;
    let client = HelperClient::new(url);

    let result = client
        .execute("take_screenshot", json!({}))
        .await
        .expect("round trip");
    assert!(result.success);
    let path = result
        .extra
        .as_ref()
        .and_then(|m| m.get("path"))
        .and_then(Value::as_str)
        .expect("path in extra");
    // Confined to the test directory, cleaned up with it.
    assert!(path.starts_with(shots.path().to_str().expect("utf8 dir")));
    assert!(path.contains("JARVIS-Screenshot-"));
}

#[tokio::test]
async fn malformed_json_gets_failure_frame() {
    let (url, _typed, _shots) = spawn_helper().await;

    let (ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.expect("connect");
    let (mut sink, mut source) = ws.split();
    sink.send(Message::Text("not json".to_owned())).await.expect("send");

    let Message::Text(text) = source.next().await.expect("frame").expect("read") else {
        panic!("expected text frame");
    };
    let result: ActionResult = serde_json::from_str(&text).expect("action result");
    assert!(!result.success);
    assert!(result.message.starts_with("Invalid request:"));
}

#[tokio::test]
async fn one_connection_serves_many_commands() {
    let (url, typed, _shots) = spawn_helper().await;

    let (ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.expect("connect");
    let (mut sink, mut source) = ws.split();

    for text in ["one", "two"] {
        let frame = json!({ "cmd": "type_text", "params": { "text": text } }).to_string();
        sink.send(Message::Text(frame)).await.expect("send");
        let Message::Text(reply) = source.next().await.expect("frame").expect("read") else {
            panic!("expected text frame");
        };
        let result: ActionResult = serde_json::from_str(&reply).expect("action result");
        assert!(result.success);
    }
    assert_eq!(typed.lock().unwrap().clone(), vec!["one", "two"]);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, health_router()).await.expect("serve");
    });

    let body: Value = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{}/health", addr.port()))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "jarvis-helper");
    assert!(body["timestamp"].as_str().is_some());
}
