//! Action dispatch: routes tool calls from the voice agent to OS effects.

use super::os::{OsActions, current_time_message};
use super::types::{ActionResult, ToolSpec};
use crate::error::{AssistantError, Result};
use crate::helper::HelperClient;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Well-known website shortcuts, checked before URL heuristics.
const WEBSITES: &[(&str, &str, &str)] = &[
    ("google", "https://www.google.com", "Google"),
    ("youtube", "https://www.youtube.com", "YouTube"),
    ("github", "https://www.github.com", "GitHub"),
    ("chatgpt", "https://chat.openai.com", "ChatGPT"),
    ("openai", "https://www.openai.com", "OpenAI"),
    ("gmail", "https://mail.google.com", "Gmail"),
    ("twitter", "https://www.twitter.com", "Twitter"),
    ("x", "https://www.x.com", "X"),
    ("facebook", "https://www.facebook.com", "Facebook"),
    ("linkedin", "https://www.linkedin.com", "LinkedIn"),
    ("reddit", "https://www.reddit.com", "Reddit"),
    ("stackoverflow", "https://stackoverflow.com", "Stack Overflow"),
    ("amazon", "https://www.amazon.com", "Amazon"),
    ("netflix", "https://www.netflix.com", "Netflix"),
];

/// Every action the executor knows how to perform.
///
/// Closed enum; [`verify_catalog`] checks it stays in lockstep with the
/// advertised catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    GetCurrentTime,
    GetSystemInfo,
    OpenApplication,
    OpenWebsite,
    SearchGoogle,
    OpenChrome,
    CreateFile,
    CreateFolder,
    ShutdownSystem,
    RestartSystem,
    CancelShutdown,
    SetVolume,
    TakeScreenshot,
}

impl ActionKind {
    pub const ALL: [Self; 13] = [
        Self::GetCurrentTime,
        Self::GetSystemInfo,
        Self::OpenApplication,
        Self::OpenWebsite,
        Self::SearchGoogle,
        Self::OpenChrome,
        Self::CreateFile,
        Self::CreateFolder,
        Self::ShutdownSystem,
        Self::RestartSystem,
        Self::CancelShutdown,
        Self::SetVolume,
        Self::TakeScreenshot,
    ];

    /// Wire name as it appears in the catalog and in tool calls.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::GetCurrentTime => "get_current_time",
            Self::GetSystemInfo => "get_system_info",
            Self::OpenApplication => "open_application",
            Self::OpenWebsite => "open_website",
            Self::SearchGoogle => "search_google",
            Self::OpenChrome => "open_chrome",
            Self::CreateFile => "create_file",
            Self::CreateFolder => "create_folder",
            Self::ShutdownSystem => "shutdown_system",
            Self::RestartSystem => "restart_system",
            Self::CancelShutdown => "cancel_shutdown",
            Self::SetVolume => "set_volume",
            Self::TakeScreenshot => "take_screenshot",
        }
    }

    /// Parse a wire name. `None` for anything outside the vocabulary.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.wire_name() == name)
    }
}

/// Check that the advertised catalog and the executor vocabulary agree,
/// in both directions.
pub fn verify_catalog(specs: &[ToolSpec]) -> Result<()> {
    let advertised: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    let executable: HashSet<&str> = ActionKind::ALL.iter().map(ActionKind::wire_name).collect();

    for name in &advertised {
        if !executable.contains(name) {
            return Err(AssistantError::Config(format!(
                "catalog advertises '{name}' but the executor cannot run it"
            )));
        }
    }
    for name in &executable {
        if !advertised.contains(name) {
            return Err(AssistantError::Config(format!(
                "executor implements '{name}' but the catalog does not advertise it"
            )));
        }
    }
    Ok(())
}

/// Resolve a website name or URL to `(url, display_name)`.
///
/// Resolution order: the shortcut table, then an explicit scheme or `www.`
/// prefix, then a Google search for the raw input.
#[must_use]
pub fn resolve_website(input: &str) -> (String, String) {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    for (key, url, display) in WEBSITES {
        if lowered == *key {
            return ((*url).to_owned(), (*display).to_owned());
        }
    }

    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return (trimmed.to_owned(), trimmed.to_owned());
    }
    if lowered.starts_with("www.") {
        return (format!("https://{trimmed}"), trimmed.to_owned());
    }

    (
        format!(
            "https://www.google.com/search?q={}",
            urlencoding::encode(trimmed)
        ),
        format!("a search for {trimmed}"),
    )
}

/// Map a friendly application name to a launch command for this platform.
/// Unknown names pass through unchanged.
#[must_use]
fn resolve_app(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    #[cfg(target_os = "windows")]
    let table: &[(&str, &str)] = &[
        ("calculator", "calc"),
        ("notepad", "notepad"),
        ("paint", "mspaint"),
        ("file manager", "explorer"),
        ("explorer", "explorer"),
        ("terminal", "cmd"),
        ("task manager", "taskmgr"),
        ("control panel", "control"),
    ];
    #[cfg(target_os = "macos")]
    let table: &[(&str, &str)] = &[
        ("calculator", "Calculator"),
        ("notepad", "TextEdit"),
        ("text editor", "TextEdit"),
        ("file manager", "Finder"),
        ("finder", "Finder"),
        ("terminal", "Terminal"),
        ("activity monitor", "Activity Monitor"),
    ];
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let table: &[(&str, &str)] = &[
        ("calculator", "gnome-calculator"),
        ("notepad", "gedit"),
        ("text editor", "gedit"),
        ("file manager", "nautilus"),
        ("files", "nautilus"),
        ("terminal", "gnome-terminal"),
        ("system monitor", "gnome-system-monitor"),
    ];

    table
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map_or_else(|| name.trim().to_owned(), |(_, cmd)| (*cmd).to_owned())
}

/// Executes tool calls against the OS.
///
/// Every call resolves to an [`ActionResult`]; unknown names and backend
/// failures come back as `success: false`, never as errors.
#[derive(Clone)]
pub struct ActionExecutor {
    os: Arc<dyn OsActions>,
    helper: Option<Arc<HelperClient>>,
}

impl ActionExecutor {
    #[must_use]
    pub fn new(os: Arc<dyn OsActions>) -> Self {
        Self { os, helper: None }
    }

    /// Attach the helper sidecar client, enabling screen-level actions.
    #[must_use]
    pub fn with_helper(mut self, helper: HelperClient) -> Self {
        self.helper = Some(Arc::new(helper));
        self
    }

    /// Execute one tool call by wire name with a JSON argument map.
    pub async fn execute(&self, name: &str, args: &Value) -> ActionResult {
        let Some(kind) = ActionKind::parse(name) else {
            warn!(tool = %name, "rejected unknown tool call");
            return ActionResult::failure(format!("Unknown tool: {name}"));
        };
        info!(tool = %name, "executing tool call");

        match kind {
            ActionKind::GetCurrentTime => ActionResult::success(current_time_message()),
            ActionKind::GetSystemInfo => {
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.system_info() {
                    Ok(info) => ActionResult::success(format!("System: {info}")),
                    Err(e) => ActionResult::failure(format!("Could not read system info: {e}")),
                })
                .await
            }
            ActionKind::OpenApplication => {
                let Some(app_name) = str_arg(args, "app_name") else {
                    return ActionResult::failure("Missing required argument: app_name");
                };
                let command = resolve_app(&app_name);
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.open_app(&command) {
                    Ok(()) => ActionResult::success(format!("Opened {app_name}")),
                    Err(e) => ActionResult::failure(format!("Could not open {app_name}: {e}")),
                })
                .await
            }
            ActionKind::OpenWebsite => {
                let Some(input) = str_arg(args, "url_or_name") else {
                    return ActionResult::failure("Missing required argument: url_or_name");
                };
                let (url, display) = resolve_website(&input);
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.open_url(&url) {
                    Ok(()) => ActionResult::success(format!("Opening {display}"))
                        .with_extra("url", json!(url)),
                    Err(e) => ActionResult::failure(format!("Could not open {display}: {e}")),
                })
                .await
            }
            ActionKind::SearchGoogle => {
                let Some(query) = str_arg(args, "query") else {
                    return ActionResult::failure("Missing required argument: query");
                };
                let url = format!(
                    "https://www.google.com/search?q={}",
                    urlencoding::encode(&query)
                );
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.open_url(&url) {
                    Ok(()) => ActionResult::success(format!("Searching Google for {query}")),
                    Err(e) => ActionResult::failure(format!("Could not search: {e}")),
                })
                .await
            }
            ActionKind::OpenChrome => {
                let os = Arc::clone(&self.os);
                Self::blocking(move || {
                    #[cfg(target_os = "macos")]
                    let command = "Google Chrome";
                    #[cfg(target_os = "windows")]
                    let command = "chrome";
                    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
                    let command = "google-chrome";
                    match os.open_app(command) {
                        Ok(()) => ActionResult::success("Opened Google Chrome"),
                        Err(e) => ActionResult::failure(format!("Could not open Chrome: {e}")),
                    }
                })
                .await
            }
            ActionKind::CreateFile => {
                let Some(filename) = str_arg(args, "filename") else {
                    return ActionResult::failure("Missing required argument: filename");
                };
                let content = str_arg(args, "content").unwrap_or_default();
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.create_file(&filename, &content) {
                    Ok(()) => ActionResult::success(format!("Created file {filename}")),
                    Err(e) => ActionResult::failure(format!("Could not create file: {e}")),
                })
                .await
            }
            ActionKind::CreateFolder => {
                let Some(folder) = str_arg(args, "folder_name") else {
                    return ActionResult::failure("Missing required argument: folder_name");
                };
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.create_folder(&folder) {
                    Ok(()) => ActionResult::success(format!("Created folder {folder}")),
                    Err(e) => ActionResult::failure(format!("Could not create folder: {e}")),
                })
                .await
            }
            ActionKind::ShutdownSystem => self.shutdown(args, false).await,
            ActionKind::RestartSystem => self.shutdown(args, true).await,
            ActionKind::CancelShutdown => {
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.cancel_shutdown() {
                    Ok(()) => ActionResult::success("Cancelled pending shutdown"),
                    Err(e) => ActionResult::failure(format!("Could not cancel shutdown: {e}")),
                })
                .await
            }
            ActionKind::SetVolume => {
                let Some(raw) = args.get("level").and_then(Value::as_f64) else {
                    return ActionResult::failure("Missing required argument: level");
                };
                // Out-of-range requests are clamped rather than rejected.
                let level = raw.clamp(0.0, 100.0).round() as u8;
                let os = Arc::clone(&self.os);
                Self::blocking(move || match os.set_volume(level) {
                    Ok(()) => ActionResult::success(format!("Volume set to {level}%")),
                    Err(e) => ActionResult::failure(format!("Could not set volume: {e}")),
                })
                .await
            }
            ActionKind::TakeScreenshot => match &self.helper {
                Some(helper) => match helper.execute("take_screenshot", json!({})).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(error = %e, "helper screenshot failed");
                        ActionResult::failure(format!("Screenshot failed: {e}"))
                    }
                },
                None => ActionResult::failure("Helper sidecar is not connected"),
            },
        }
    }

    async fn shutdown(&self, args: &Value, restart: bool) -> ActionResult {
        let minutes = args
            .get("minutes")
            .and_then(Value::as_f64)
            .map_or(0, |m| m.max(0.0) as u64);
        let verb = if restart { "restart" } else { "shutdown" };
        let os = Arc::clone(&self.os);
        Self::blocking(move || match os.schedule_shutdown(minutes, restart) {
            Ok(()) => {
                let when = if minutes == 0 {
                    "now".to_owned()
                } else {
                    format!("in {minutes} minute(s)")
                };
                ActionResult::success(format!("System will {verb} {when}"))
            }
            Err(e) => ActionResult::failure(format!("Could not {verb}: {e}")),
        })
        .await
    }

    /// Run a blocking OS call off the async runtime.
    async fn blocking<F>(f: F) -> ActionResult
    where
        F: FnOnce() -> ActionResult + Send + 'static,
    {
        match tokio::task::spawn_blocking(f).await {
            Ok(result) => result,
            Err(e) => ActionResult::failure(format!("Action task failed: {e}")),
        }
    }
}

fn str_arg(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::tools::catalog::list_tools;
    // The crate Result alias would otherwise shadow the two-argument form.
    use std::result::Result;
    use std::sync::Mutex;

    /// Records every OS call instead of performing it.
    #[derive(Default)]
    struct RecordingOsActions {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingOsActions {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl OsActions for RecordingOsActions {
        fn open_url(&self, url: &str) -> Result<(), String> {
            self.record(format!("open_url:{url}"));
            Ok(())
        }
        fn open_app(&self, command: &str) -> Result<(), String> {
            self.record(format!("open_app:{command}"));
            Ok(())
        }
        fn create_file(&self, path: &str, _content: &str) -> Result<(), String> {
            self.record(format!("create_file:{path}"));
            Ok(())
        }
        fn create_folder(&self, path: &str) -> Result<(), String> {
            self.record(format!("create_folder:{path}"));
            Ok(())
        }
        fn schedule_shutdown(&self, minutes: u64, restart: bool) -> Result<(), String> {
            self.record(format!("schedule_shutdown:{minutes}:{restart}"));
            Ok(())
        }
        fn cancel_shutdown(&self) -> Result<(), String> {
            self.record("cancel_shutdown".to_owned());
            Ok(())
        }
        fn set_volume(&self, level: u8) -> Result<(), String> {
            self.record(format!("set_volume:{level}"));
            Ok(())
        }
        fn system_info(&self) -> Result<String, String> {
            Ok("TestOS 1.0".to_owned())
        }
    }

    fn executor() -> (Arc<RecordingOsActions>, ActionExecutor) {
        let os = Arc::new(RecordingOsActions::default());
        let executor = ActionExecutor::new(os.clone());
        (os, executor)
    }

    #[test]
    fn catalog_and_executor_agree() {
        verify_catalog(&list_tools()).expect("catalog parity");
    }

    #[test]
    fn verify_catalog_rejects_extra_spec() {
        let mut specs = list_tools();
        specs.push(ToolSpec::new(
            "launch_rockets",
            "not a real action",
            json!({ "type": "object", "properties": {} }),
        ));
        assert!(verify_catalog(&specs).is_err());
    }

    #[test]
    fn verify_catalog_rejects_missing_spec() {
        let mut specs = list_tools();
        specs.retain(|s| s.name != "set_volume");
        assert!(verify_catalog(&specs).is_err());
    }

    #[test]
    fn website_resolution_order() {
        // Shortcut table first, case-insensitive.
        let (url, display) = resolve_website("Google");
        assert_eq!(url, "https://www.google.com");
        assert_eq!(display, "Google");

        // Explicit scheme passes through.
        let (url, _) = resolve_website("https://example.org/page");
        assert_eq!(url, "https://example.org/page");

        // www. prefix gets a scheme.
        let (url, _) = resolve_website("www.example.org");
        assert_eq!(url, "https://www.example.org");

        // Bare domains are NOT guessed at; they become a search.
        let (url, display) = resolve_website("example.org");
        assert_eq!(url, "https://www.google.com/search?q=example.org");
        assert_eq!(display, "a search for example.org");
    }

    #[tokio::test]
    async fn unknown_tool_fails_as_value() {
        let (os, executor) = executor();
        let result = executor.execute("unknown_action", &json!({})).await;
        assert!(!result.success);
        assert_eq!(result.message, "Unknown tool: unknown_action");
        assert!(os.calls().is_empty());
    }

    #[tokio::test]
    async fn get_current_time_needs_no_arguments() {
        let (_, executor) = executor();
        let result = executor.execute("get_current_time", &json!({})).await;
        assert!(result.success);
        assert!(result.message.starts_with("It's currently "));
    }

    #[tokio::test]
    async fn open_website_uses_shortcut_table() {
        let (os, executor) = executor();
        let result = executor
            .execute("open_website", &json!({ "url_or_name": "youtube" }))
            .await;
        assert!(result.success);
        assert_eq!(result.message, "Opening YouTube");
        assert_eq!(os.calls(), vec!["open_url:https://www.youtube.com"]);
    }

    #[tokio::test]
    async fn open_website_without_argument_fails() {
        let (os, executor) = executor();
        let result = executor.execute("open_website", &json!({})).await;
        assert!(!result.success);
        assert!(os.calls().is_empty());
    }

    #[tokio::test]
    async fn search_google_urlencodes_query() {
        let (os, executor) = executor();
        let result = executor
            .execute("search_google", &json!({ "query": "rust async runtime" }))
            .await;
        assert!(result.success);
        assert_eq!(
            os.calls(),
            vec!["open_url:https://www.google.com/search?q=rust%20async%20runtime"]
        );
    }

    #[tokio::test]
    async fn set_volume_clamps_out_of_range() {
        let (os, executor) = executor();
        let result = executor.execute("set_volume", &json!({ "level": 250 })).await;
        assert!(result.success);
        assert_eq!(result.message, "Volume set to 100%");

        let result = executor.execute("set_volume", &json!({ "level": -5 })).await;
        assert!(result.success);
        assert_eq!(result.message, "Volume set to 0%");

        assert_eq!(os.calls(), vec!["set_volume:100", "set_volume:0"]);
    }

    #[tokio::test]
    async fn shutdown_minutes_defaults_to_now() {
        let (os, executor) = executor();
        let result = executor.execute("shutdown_system", &json!({})).await;
        assert!(result.success);
        assert_eq!(result.message, "System will shutdown now");

        let result = executor
            .execute("restart_system", &json!({ "minutes": 5 }))
            .await;
        assert!(result.success);
        assert_eq!(result.message, "System will restart in 5 minute(s)");

        assert_eq!(
            os.calls(),
            vec!["schedule_shutdown:0:false", "schedule_shutdown:5:true"]
        );
    }

    #[tokio::test]
    async fn screenshot_without_helper_fails_cleanly() {
        let (_, executor) = executor();
        let result = executor.execute("take_screenshot", &json!({})).await;
        assert!(!result.success);
        assert_eq!(result.message, "Helper sidecar is not connected");
    }
}
