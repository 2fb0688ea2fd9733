//! Speech synthesis port and its HTTP adapter.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;
pub use voxchat_core::TERMS_REQUIRED_ERROR_TYPE;

use crate::config::SpeechConfig;
use crate::error::SynthesisError;

/// Body of a synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub model: String,
    pub voice: String,
}

/// Failure body returned by the endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Anything that turns text into an audio payload.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `request`, returning the encoded audio (WAV for the HTTP
    /// endpoint).
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Bytes, SynthesisError>;
}

/// Classify a non-success response from its status and raw body.
#[must_use]
pub fn classify_failure(status: u16, body: &[u8]) -> SynthesisError {
    let parsed: SynthesisErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .error
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "TTS request failed".to_string());

    if parsed.error_type.as_deref() == Some(TERMS_REQUIRED_ERROR_TYPE) {
        SynthesisError::TermsRequired { message }
    } else {
        SynthesisError::Rejected { status, message }
    }
}

/// Synthesizer backed by the `POST /api/tts` endpoint.
#[derive(Debug, Clone)]
pub struct HttpSynthesizer {
    client: Client,
    endpoint: Url,
}

impl HttpSynthesizer {
    pub fn new(config: &SpeechConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, config.endpoint.clone()))
    }

    #[must_use]
    pub const fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Bytes, SynthesisError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            voice = %request.voice,
            chars = request.text.chars().count(),
            "Requesting speech synthesis"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;

        if status.is_success() {
            tracing::debug!(bytes = body.len(), "Speech synthesized");
            return Ok(body);
        }

        let err = classify_failure(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), kind = err.kind(), error = %err, "Synthesis endpoint refused");
        Err(err)
    }
}
