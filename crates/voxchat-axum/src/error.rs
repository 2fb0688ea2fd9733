//! Axum-specific error types and mappings.
//!
//! Error bodies use the shape the chat client expects from `/api/tts`:
//! `{ "success": false, "error": "...", "error_type"?: "..." }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use voxchat_core::TERMS_REQUIRED_ERROR_TYPE;

use crate::upstream::UpstreamError;

/// Message sent to the client when upstream wants its model terms accepted.
pub const TERMS_REQUIRED_MESSAGE: &str = "TTS requires terms acceptance. Please visit \
     https://console.groq.com/playground?model=playai-tts to accept terms.";

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream speech model terms have not been accepted.
    #[error("Terms acceptance required")]
    TermsRequired,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    /// Stable error type discriminant for client-side handling
    #[serde(skip_serializing_if = "Option::is_none")]
    error_type: Option<&'static str>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message, error_type) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Self::TermsRequired => (
                StatusCode::FORBIDDEN,
                TERMS_REQUIRED_MESSAGE.to_string(),
                Some(TERMS_REQUIRED_ERROR_TYPE),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let body = ErrorBody {
            success: false,
            error: message,
            error_type,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<UpstreamError> for HttpError {
    fn from(err: UpstreamError) -> Self {
        if err.is_terms_required() {
            Self::TermsRequired
        } else {
            Self::Internal(format!("Error generating speech: {err}"))
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
