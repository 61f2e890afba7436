//! Browser control for the helper's `browser_goto` / `browser_search`
//! commands.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// Drives a web browser by URL.
pub trait BrowserControl: Send + Sync {
    /// Open the given URL, returning a short confirmation message.
    fn goto(&self, url: &str) -> Result<String, String>;

    /// Run a Google search for the query.
    fn search(&self, query: &str) -> Result<String, String>;
}

/// [`BrowserControl`] backed by a locally installed browser.
///
/// Discovery runs once on first use and the outcome is cached, so a machine
/// without a known browser degrades every call to the same failure message.
#[derive(Default)]
pub struct SystemBrowser {
    binary: OnceLock<Result<PathBuf, String>>,
}

#[cfg(target_os = "macos")]
const CANDIDATES: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const CANDIDATES: &[&str] = &["chrome", "msedge", "firefox"];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "firefox",
    "xdg-open",
];

impl SystemBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn binary(&self) -> Result<&PathBuf, String> {
        self.binary
            .get_or_init(|| {
                CANDIDATES
                    .iter()
                    .find_map(|name| which::which(name).ok())
                    .ok_or_else(|| format!("no browser found (tried {})", CANDIDATES.join(", ")))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    fn launch(&self, url: &str) -> Result<(), String> {
        let binary = self.binary()?;
        Command::new(binary)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| format!("failed to launch {}: {e}", binary.display()))
    }
}

impl BrowserControl for SystemBrowser {
    fn goto(&self, url: &str) -> Result<String, String> {
        self.launch(url)?;
        Ok(format!("Opened {url}"))
    }

    fn search(&self, query: &str) -> Result<String, String> {
        let url = format!(
            "https://www.google.com/search?q={}",
            urlencoding::encode(query)
        );
        self.launch(&url)?;
        Ok(format!("Searching for {query}"))
    }
}
