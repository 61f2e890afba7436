//! Narrow OS-effects capability interface.
//!
//! Every externally observable effect the executor can perform goes through
//! [`OsActions`], so the dispatch logic is testable with a fake
//! implementation. [`ShellOsActions`] is the real one, wrapping platform
//! shell commands and `std::fs`.

use std::process::{Command, Stdio};

/// OS-level effects used by the action executor.
///
/// Errors are descriptive strings; the executor converts them into failed
/// [`ActionResult`](super::types::ActionResult)s at its boundary.
pub trait OsActions: Send + Sync {
    /// Open a URL with the system's default browser handler.
    fn open_url(&self, url: &str) -> Result<(), String>;

    /// Launch an application by command name.
    fn open_app(&self, command: &str) -> Result<(), String>;

    /// Create (or silently overwrite) a file with the given content.
    fn create_file(&self, path: &str, content: &str) -> Result<(), String>;

    /// Create a folder, including missing parents.
    fn create_folder(&self, path: &str) -> Result<(), String>;

    /// Schedule a shutdown (or restart) after `minutes` (0 = immediate).
    fn schedule_shutdown(&self, minutes: u64, restart: bool) -> Result<(), String>;

    /// Abort a pending shutdown or restart.
    fn cancel_shutdown(&self) -> Result<(), String>;

    /// Set the absolute output volume level (already clamped to 0-100).
    fn set_volume(&self, level: u8) -> Result<(), String>;

    /// One-line system description (OS name/version).
    fn system_info(&self) -> Result<String, String>;
}

/// Real [`OsActions`] implementation driving platform shell commands.
#[derive(Debug, Default)]
pub struct ShellOsActions;

impl ShellOsActions {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run a command to completion, capturing output. Non-zero exit is an
    /// error carrying stderr (or stdout when stderr is empty).
    fn run(program: &str, args: &[&str]) -> Result<String, String> {
        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| format!("failed to spawn {program}: {e}"))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            return Err(format!(
                "{program} exited with code {code}: {}",
                detail.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Spawn a command detached, without waiting for it to exit. Used for
    /// launching applications that keep running.
    fn spawn_detached(program: &str, args: &[&str]) -> Result<(), String> {
        Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| format!("failed to spawn {program}: {e}"))
    }
}

impl OsActions for ShellOsActions {
    fn open_url(&self, url: &str) -> Result<(), String> {
        #[cfg(target_os = "windows")]
        {
            Self::spawn_detached("cmd", &["/C", "start", "", url])
        }
        #[cfg(target_os = "macos")]
        {
            Self::spawn_detached("open", &[url])
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Self::spawn_detached("xdg-open", &[url])
        }
    }

    fn open_app(&self, command: &str) -> Result<(), String> {
        #[cfg(target_os = "windows")]
        {
            Self::spawn_detached("cmd", &["/C", "start", "", command])
        }
        #[cfg(target_os = "macos")]
        {
            Self::spawn_detached("open", &["-a", command])
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Self::spawn_detached(command, &[])
        }
    }

    fn create_file(&self, path: &str, content: &str) -> Result<(), String> {
        std::fs::write(path, content).map_err(|e| format!("failed to write {path}: {e}"))
    }

    fn create_folder(&self, path: &str) -> Result<(), String> {
        std::fs::create_dir_all(path).map_err(|e| format!("failed to create {path}: {e}"))
    }

    fn schedule_shutdown(&self, minutes: u64, restart: bool) -> Result<(), String> {
        #[cfg(target_os = "windows")]
        {
            let flag = if restart { "/r" } else { "/s" };
            let seconds = (minutes * 60).to_string();
            Self::run("shutdown", &[flag, "/t", &seconds]).map(|_| ())
        }
        #[cfg(not(target_os = "windows"))]
        {
            let flag = if restart { "-r" } else { "-h" };
            let when = if minutes == 0 {
                "now".to_owned()
            } else {
                format!("+{minutes}")
            };
            Self::run("shutdown", &[flag, &when]).map(|_| ())
        }
    }

    fn cancel_shutdown(&self) -> Result<(), String> {
        #[cfg(target_os = "windows")]
        {
            Self::run("shutdown", &["/a"]).map(|_| ())
        }
        #[cfg(not(target_os = "windows"))]
        {
            Self::run("shutdown", &["-c"]).map(|_| ())
        }
    }

    fn set_volume(&self, level: u8) -> Result<(), String> {
        #[cfg(target_os = "macos")]
        {
            let script = format!("set volume output volume {level}");
            Self::run("osascript", &["-e", &script]).map(|_| ())
        }
        #[cfg(target_os = "windows")]
        {
            // No built-in absolute-volume command; nircmd is the common tool.
            if which::which("nircmd").is_err() {
                return Err("volume control requires nircmd on PATH".to_owned());
            }
            // nircmd takes 0-65535.
            let raw = (u32::from(level) * 65_535 / 100).to_string();
            Self::run("nircmd", &["setsysvolume", &raw]).map(|_| ())
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            // Prefer PulseAudio/PipeWire, fall back to ALSA.
            let percent = format!("{level}%");
            if which::which("pactl").is_ok() {
                return Self::run("pactl", &["set-sink-volume", "@DEFAULT_SINK@", &percent])
                    .map(|_| ());
            }
            Self::run("amixer", &["set", "Master", &percent]).map(|_| ())
        }
    }

    fn system_info(&self) -> Result<String, String> {
        #[cfg(target_os = "windows")]
        {
            Self::run("cmd", &["/C", "systeminfo | findstr OS"]).map(|out| out.trim().to_owned())
        }
        #[cfg(target_os = "macos")]
        {
            let name = Self::run("sw_vers", &["-productName"])?;
            let version = Self::run("sw_vers", &["-productVersion"])?;
            Ok(format!("{} {}", name.trim(), version.trim()))
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Self::run("uname", &["-sr"]).map(|out| out.trim().to_owned())
        }
    }
}

/// Human-readable current time message, e.g.
/// `It's currently 3:04 PM on Monday, January 2, 2006`.
#[must_use]
pub fn current_time_message() -> String {
    let now = chrono::Local::now();
    format!(
        "It's currently {} on {}",
        now.format("%-I:%M %p"),
        now.format("%A, %B %-d, %Y")
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn create_file_writes_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.txt");
        let path_str = path.to_str().expect("utf8 path");

        let os = ShellOsActions::new();
        os.create_file(path_str, "first").expect("create");
        os.create_file(path_str, "second").expect("overwrite");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "second");
    }

    #[test]
    fn create_folder_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a").join("b");
        let path_str = path.to_str().expect("utf8 path");

        let os = ShellOsActions::new();
        os.create_folder(path_str).expect("create");
        os.create_folder(path_str).expect("create again");
        assert!(path.is_dir());
    }

    #[test]
    fn run_reports_spawn_failure() {
        let result = ShellOsActions::run("jarvis-no-such-binary", &[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("failed to spawn"));
    }

    #[test]
    fn current_time_message_has_expected_shape() {
        let message = current_time_message();
        assert!(message.starts_with("It's currently "));
        assert!(message.contains(" on "));
    }
}
