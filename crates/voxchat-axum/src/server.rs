//! Axum server bootstrap - the composition root.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::routes::create_router;
use crate::state::AxumContext;
use crate::upstream::GroqSpeechClient;

/// Wire the production services for `config`.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    if config.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; /api/tts will fail until it is");
    }

    Ok(AxumContext {
        upstream: Arc::new(GroqSpeechClient::new(config)?),
    })
}

/// Start the web server on the configured port and serve until it fails.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config)?;
    let app = create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(upstream = %config.upstream_url, "voxchat web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
