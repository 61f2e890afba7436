//! Keyboard, mouse, and screenshot backends.
//!
//! Same shape on every platform: a [`AutomationBackend`] trait with one
//! implementation per OS, selected at startup by [`detect_backend`]. All
//! methods shell out to platform tools and are blocking; the helper service
//! runs them on the blocking pool.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Screen-level automation primitives.
pub trait AutomationBackend: Send + Sync {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Whether the backend's tools are present on this machine.
    fn is_available(&self) -> bool;

    /// Type text into the currently focused window.
    fn type_text(&self, text: &str) -> Result<(), String>;

    /// Click the primary button at the center of the screen.
    fn click_center(&self) -> Result<(), String>;

    /// Capture the full screen to `path` as PNG.
    fn screenshot(&self, path: &Path) -> Result<(), String>;
}

fn run(program: &str, args: &[&str]) -> Result<String, String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| format!("failed to spawn {program}: {e}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{program} failed: {}", stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Linux backend: `xdotool` for input, `scrot` for screenshots.
pub struct XdotoolBackend;

impl AutomationBackend for XdotoolBackend {
    fn name(&self) -> &'static str {
        "xdotool"
    }

    fn is_available(&self) -> bool {
        which::which("xdotool").is_ok()
    }

    fn type_text(&self, text: &str) -> Result<(), String> {
        run("xdotool", &["type", "--delay", "12", "--", text]).map(|_| ())
    }

    fn click_center(&self) -> Result<(), String> {
        let geometry = run("xdotool", &["getdisplaygeometry"])?;
        let mut parts = geometry.split_whitespace();
        let (Some(w), Some(h)) = (parts.next(), parts.next()) else {
            return Err(format!("unexpected geometry output: {geometry}"));
        };
        let x = w
            .parse::<u32>()
            .map_err(|e| format!("bad display width {w}: {e}"))?
            / 2;
        let y = h
            .parse::<u32>()
            .map_err(|e| format!("bad display height {h}: {e}"))?
            / 2;
        run(
            "xdotool",
            &["mousemove", &x.to_string(), &y.to_string(), "click", "1"],
        )
        .map(|_| ())
    }

    fn screenshot(&self, path: &Path) -> Result<(), String> {
        let path = path
            .to_str()
            .ok_or_else(|| "screenshot path is not valid UTF-8".to_owned())?;
        run("scrot", &["--overwrite", path]).map(|_| ())
    }
}

/// macOS backend: AppleScript for input, `screencapture` for screenshots.
pub struct MacAutomationBackend;

impl AutomationBackend for MacAutomationBackend {
    fn name(&self) -> &'static str {
        "applescript"
    }

    fn is_available(&self) -> bool {
        which::which("osascript").is_ok()
    }

    fn type_text(&self, text: &str) -> Result<(), String> {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        let script = format!("tell application \"System Events\" to keystroke \"{escaped}\"");
        run("osascript", &["-e", &script]).map(|_| ())
    }

    fn click_center(&self) -> Result<(), String> {
        // cliclick is the usual tool; AppleScript alone cannot click at
        // coordinates without UI scripting into a specific app.
        if which::which("cliclick").is_err() {
            return Err("click requires cliclick on PATH".to_owned());
        }
        let bounds = run(
            "osascript",
            &["-e", "tell application \"Finder\" to get bounds of window of desktop"],
        )?;
        let dims: Vec<u32> = bounds
            .split(',')
            .filter_map(|p| p.trim().parse().ok())
            .collect();
        let (w, h) = match dims.as_slice() {
            [_, _, w, h] => (*w, *h),
            _ => return Err(format!("unexpected bounds output: {bounds}")),
        };
        run("cliclick", &[&format!("c:{},{}", w / 2, h / 2)]).map(|_| ())
    }

    fn screenshot(&self, path: &Path) -> Result<(), String> {
        let path = path
            .to_str()
            .ok_or_else(|| "screenshot path is not valid UTF-8".to_owned())?;
        run("screencapture", &["-x", path]).map(|_| ())
    }
}

/// Pick the backend for this platform, failing when its tools are missing.
pub fn detect_backend() -> Result<Box<dyn AutomationBackend>, String> {
    #[cfg(target_os = "macos")]
    let backend: Box<dyn AutomationBackend> = Box::new(MacAutomationBackend);
    #[cfg(not(target_os = "macos"))]
    let backend: Box<dyn AutomationBackend> = Box::new(XdotoolBackend);

    if backend.is_available() {
        Ok(backend)
    } else {
        Err(format!(
            "automation backend '{}' is not available on this machine",
            backend.name()
        ))
    }
}

/// Default screenshot directory: the Desktop, falling back to the home
/// directory, then the temp dir.
#[must_use]
pub fn default_screenshot_dir() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Destination for a new screenshot inside `dir`:
/// `JARVIS-Screenshot-<timestamp>.png`, collision-resistant to the second.
#[must_use]
pub fn screenshot_path(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("JARVIS-Screenshot-{stamp}.png"))
}
