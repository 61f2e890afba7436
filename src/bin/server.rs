//! Gateway server binary.
//!
//! Usage: `jarvis-server [config.toml]` (defaults to `jarvis.toml`, missing
//! file falls back to built-in defaults).

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

    jarvis::run_server(config).await.context("running gateway")?;
    Ok(())
}
