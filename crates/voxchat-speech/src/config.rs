//! Speech configuration.
//!
//! Read from the environment (a `.env` file is loaded by the binary before
//! this runs). Every key has a default, so an empty environment is valid.

use std::time::Duration;

use url::Url;
use voxchat_core::VoiceSelector;

use crate::error::ConfigError;

pub const ENDPOINT_ENV: &str = "VOXCHAT_TTS_ENDPOINT";
pub const VOICE_ENV: &str = "VOXCHAT_VOICE";
pub const TIMEOUT_ENV: &str = "VOXCHAT_TTS_TIMEOUT_SECS";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/tts";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to request synthesized speech.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Synthesis endpoint accepting `POST { text, model, voice }`.
    pub endpoint: Url,
    /// Voice used when the caller does not pick one.
    pub default_voice: VoiceSelector,
    /// Whole-request timeout for synthesis calls.
    pub request_timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            default_voice: VoiceSelector::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SpeechConfig {
    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENDPOINT_ENV) {
            config.endpoint = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                key: ENDPOINT_ENV,
                reason: e.to_string(),
            })?;
        }

        if let Some(raw) = get(VOICE_ENV) {
            config.default_voice =
                VoiceSelector::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                    key: VOICE_ENV,
                    reason: e.to_string(),
                })?;
        }

        if let Some(raw) = get(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: TIMEOUT_ENV,
                    reason: e.to_string(),
                }
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: TIMEOUT_ENV,
                    reason: "must be at least 1 second".to_string(),
                });
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
