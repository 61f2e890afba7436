//! Command dispatch for the helper sidecar.

use super::automation::{
    AutomationBackend, default_screenshot_dir, detect_backend, screenshot_path,
};
use super::browser::{BrowserControl, SystemBrowser};
use super::protocol::{HelperCommand, HelperRequest};
use crate::error::{AssistantError, Result};
use crate::tools::os::{OsActions, ShellOsActions};
use crate::tools::types::ActionResult;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Dispatches helper commands to the automation and browser backends.
///
/// All handlers are blocking; callers run [`dispatch`](Self::dispatch) on
/// the blocking pool.
pub struct HelperService {
    automation: Box<dyn AutomationBackend>,
    browser: Box<dyn BrowserControl>,
    os: Arc<dyn OsActions>,
    screenshot_dir: PathBuf,
}

impl HelperService {
    /// Build the service with the platform backends.
    pub fn new() -> Result<Self> {
        let automation = detect_backend().map_err(AssistantError::Helper)?;
        info!(backend = automation.name(), "automation backend ready");
        Ok(Self::with_parts(
            automation,
            Box::new(SystemBrowser::new()),
            Arc::new(ShellOsActions::new()),
        ))
    }

    /// Build from explicit parts. Used in tests with fakes.
    #[must_use]
    pub fn with_parts(
        automation: Box<dyn AutomationBackend>,
        browser: Box<dyn BrowserControl>,
        os: Arc<dyn OsActions>,
    ) -> Self {
        Self {
            automation,
            browser,
            os,
            screenshot_dir: default_screenshot_dir(),
        }
    }

    /// Override the screenshot destination directory.
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Handle one request. Never fails; problems come back as failed
    /// [`ActionResult`]s.
    pub fn dispatch(&self, request: &HelperRequest) -> ActionResult {
        let Some(command) = HelperCommand::parse(&request.cmd) else {
            warn!(cmd = %request.cmd, "rejected unknown helper command");
            return ActionResult::failure(format!("Unknown command: {}", request.cmd));
        };
        info!(cmd = command.as_str(), "dispatching helper command");

        match command {
            HelperCommand::OpenApp => {
                let Some(app) = str_param(&request.params, "app") else {
                    return ActionResult::failure("Missing required param: app");
                };
                match self.os.open_app(&app) {
                    Ok(()) => ActionResult::success(format!("Opened {app}")),
                    Err(e) => ActionResult::failure(format!("Could not open {app}: {e}")),
                }
            }
            HelperCommand::BrowserGoto => {
                let Some(url) = str_param(&request.params, "url") else {
                    return ActionResult::failure("Missing required param: url");
                };
                let url = normalize_url(&url);
                match self.browser.goto(&url) {
                    Ok(message) => ActionResult::success(message),
                    Err(e) => ActionResult::failure(e),
                }
            }
            HelperCommand::BrowserSearch => {
                let Some(query) = str_param(&request.params, "query") else {
                    return ActionResult::failure("Missing required param: query");
                };
                match self.browser.search(&query) {
                    Ok(message) => ActionResult::success(message),
                    Err(e) => ActionResult::failure(e),
                }
            }
            HelperCommand::TypeText => {
                let Some(text) = str_param(&request.params, "text") else {
                    return ActionResult::failure("Missing required param: text");
                };
                match self.automation.type_text(&text) {
                    Ok(()) => {
                        ActionResult::success(format!("Typed {} characters", text.chars().count()))
                    }
                    Err(e) => ActionResult::failure(format!("Could not type text: {e}")),
                }
            }
            HelperCommand::ClickCenter => match self.automation.click_center() {
                Ok(()) => ActionResult::success("Clicked screen center"),
                Err(e) => ActionResult::failure(format!("Could not click: {e}")),
            },
            HelperCommand::TakeScreenshot => {
                let path = screenshot_path(&self.screenshot_dir);
                match self.automation.screenshot(&path) {
                    Ok(()) => ActionResult::success("Screenshot saved")
                        .with_extra("path", json!(path.to_string_lossy())),
                    Err(e) => ActionResult::failure(format!("Could not take screenshot: {e}")),
                }
            }
        }
    }
}

/// Prepend `https://` when the URL has no scheme.
fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}

fn str_param(params: &Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
