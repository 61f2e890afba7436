//! Error types for the assistant server and helper sidecar.

/// Top-level error type for the voice assistant system.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Configuration error (bad config file, missing credential).
    #[error("config error: {0}")]
    Config(String),

    /// Session state transition rejected (safety interlock engaged).
    #[error("state error: {0}")]
    State(String),

    /// Upstream realtime speech session error.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Helper sidecar command channel error.
    #[error("helper error: {0}")]
    Helper(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AssistantError>;
