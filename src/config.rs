//! Configuration types for the assistant server and helper sidecar.

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, loaded from a TOML file. Every field has a
/// default so a missing or partial file still yields a working config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP/WebSocket listener settings.
    pub http: HttpConfig,
    /// Upstream realtime speech API settings.
    pub upstream: UpstreamConfig,
    /// Helper sidecar settings (command channel + health endpoint).
    pub helper: HelperConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AssistantError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            AssistantError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Load configuration from a TOML file, or fall back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Upstream realtime speech API configuration.
///
/// The credential itself is never stored in the config file; it is read from
/// the environment variable named by `api_key_env` at session time. Absence
/// is tolerated at startup and fatal per voice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// WebSocket endpoint of the realtime API.
    pub realtime_url: String,
    /// Realtime model identifier, passed as the `model` query parameter.
    pub model: String,
    /// Environment variable holding the API credential.
    pub api_key_env: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            realtime_url: "wss://api.openai.com/v1/realtime".to_owned(),
            model: "gpt-4o-realtime-preview".to_owned(),
            api_key_env: "OPENAI_API_KEY".to_owned(),
        }
    }
}

impl UpstreamConfig {
    /// Resolve the API credential from the environment.
    ///
    /// Returns `None` when the variable is unset or blank.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    }
}

/// Helper sidecar configuration. Used by the helper binary to bind its
/// listeners and by the server to reach the command channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    /// Bind host for both helper listeners.
    pub host: String,
    /// WebSocket command channel port.
    pub command_port: u16,
    /// HTTP health endpoint port.
    pub health_port: u16,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            command_port: 8788,
            health_port: 8787,
        }
    }
}

impl HelperConfig {
    /// WebSocket URL of the command channel, as seen from the server.
    #[must_use]
    pub fn command_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.command_port)
    }
}
