//! Serve command handler.

use anyhow::Result;
use voxchat_axum::{ServerConfig, start_server};

/// Apply command-line overrides on top of the environment configuration.
#[must_use]
pub fn apply_overrides(
    mut config: ServerConfig,
    port: Option<u16>,
    cors_origins: Vec<String>,
) -> ServerConfig {
    if let Some(port) = port {
        config = config.with_port(port);
    }
    let origins: Vec<String> = cors_origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if !origins.is_empty() {
        config = config.with_allowed_origins(origins);
    }
    config
}

/// Run the web server until it fails or the process is killed.
pub async fn execute(port: Option<u16>, cors_origins: Vec<String>) -> Result<()> {
    let config = apply_overrides(ServerConfig::from_env()?, port, cors_origins);
    start_server(config).await
}
