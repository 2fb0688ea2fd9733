//! Route definitions and router construction.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::handlers;
use crate::state::{AppState, AxumContext};

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// API routes, without state applied.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/render", post(handlers::render::render))
        .route("/api/tts", post(handlers::tts::synthesize))
}

/// Create the main Axum router.
pub fn create_router(ctx: AxumContext, cors: &CorsConfig) -> Router {
    api_routes()
        .with_state(Arc::new(ctx))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors))
}
