//! `POST /api/render`: server-side message rendering.

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub html: String,
}

/// `POST /api/render`
pub async fn render(Json(req): Json<RenderRequest>) -> Json<RenderResponse> {
    Json(RenderResponse {
        html: voxchat_core::render(&req.text),
    })
}
