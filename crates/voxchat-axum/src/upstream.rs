//! Upstream speech API.
//!
//! `/api/tts` forwards to an OpenAI-compatible `audio/speech` endpoint. The
//! port keeps handlers testable without network access.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ServerConfig;

/// Audio format requested from upstream.
pub const RESPONSE_FORMAT: &str = "wav";

/// Errors from the upstream speech API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// No API key configured.
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,

    /// Upstream answered with a non-success status.
    #[error("TTS API error: {message}")]
    Api { status: u16, message: String },

    /// Connect, timeout or body-read failure.
    #[error("Network error generating speech: {0}")]
    Network(String),
}

impl UpstreamError {
    /// Whether upstream refused because its model terms were never accepted.
    #[must_use]
    pub fn is_terms_required(&self) -> bool {
        match self {
            Self::Api { message, .. } => message.to_lowercase().contains("terms acceptance"),
            _ => false,
        }
    }
}

/// Anything that can synthesize speech for the proxy.
#[async_trait]
pub trait UpstreamSpeech: Send + Sync {
    async fn speech(&self, text: &str, model: &str, voice: &str) -> Result<Bytes, UpstreamError>;
}

/// Body of an upstream speech request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechPayload {
    pub model: String,
    pub voice: String,
    pub input: String,
    pub response_format: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// reqwest client for Groq's `audio/speech` endpoint.
pub struct GroqSpeechClient {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
}

impl GroqSpeechClient {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.upstream_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl UpstreamSpeech for GroqSpeechClient {
    async fn speech(&self, text: &str, model: &str, voice: &str) -> Result<Bytes, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;
        let payload = SpeechPayload {
            model: model.to_string(),
            voice: voice.to_string(),
            input: text.to_string(),
            response_format: RESPONSE_FORMAT.to_string(),
        };

        let response = self
            .client
            .post(self.url.as_str())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        let parsed: ApiErrorBody = serde_json::from_slice(&body).unwrap_or_default();
        let message = parsed
            .error
            .and_then(|detail| detail.message)
            .unwrap_or_else(|| "Unknown error".to_string());

        Err(UpstreamError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
