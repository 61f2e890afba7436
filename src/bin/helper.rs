//! Helper sidecar binary.
//!
//! Runs with the user's desktop session so it can type, click, and capture
//! the screen. Usage: `jarvis-helper [config.toml]`.

use anyhow::Context;
use jarvis::ServerConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("jarvis.toml"), PathBuf::from);
    let config = ServerConfig::load_or_default(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;

    jarvis::run_helper(config.helper)
        .await
        .context("running helper sidecar")?;
    Ok(())
}
