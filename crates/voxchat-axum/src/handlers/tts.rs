//! `POST /api/tts`: speech synthesis proxy.
//!
//! Accepts `{ text, model?, voice? }`, forwards to the upstream speech API and
//! streams back the WAV payload. Failures use the JSON error shape from
//! [`crate::error`].

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use voxchat_core::{
    DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE, MAX_SYNTHESIS_CHARS, truncate_for_synthesis,
};

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

/// `POST /api/tts`
pub async fn synthesize(
    State(state): State<AppState>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(req) = payload?;
    if req.text.is_empty() {
        return Err(HttpError::BadRequest("Text is required".to_string()));
    }

    let text = truncate_for_synthesis(&req.text, MAX_SYNTHESIS_CHARS);
    let model = req.model.as_deref().unwrap_or(DEFAULT_TTS_MODEL);
    let voice = req.voice.as_deref().unwrap_or(DEFAULT_TTS_VOICE);

    if text.len() < req.text.len() {
        tracing::debug!(
            chars = MAX_SYNTHESIS_CHARS,
            "Speech text truncated to upstream limit"
        );
    }

    let audio = state
        .upstream
        .speech(text, model, voice)
        .await
        .inspect_err(|e| tracing::warn!(model, voice, error = %e, "Upstream speech failed"))?;

    tracing::info!(model, voice, bytes = audio.len(), "Speech synthesized");

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"speech.wav\""),
        ],
        audio,
    )
        .into_response())
}
