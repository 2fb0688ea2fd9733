//! Voice selector: which synthesis model and voice to speak with.
//!
//! Encoded as `"<model>|<voice>"`, or the literal `"disabled"`. The selector is
//! not checked against any voice catalog; unknown pairs are rejected by the
//! synthesis endpoint, not here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Encoded value meaning "speech output is turned off".
pub const DISABLED_SENTINEL: &str = "disabled";

/// Synthesis model used when none is given.
pub const DEFAULT_TTS_MODEL: &str = "playai-tts";

/// Voice used when none is given.
pub const DEFAULT_TTS_VOICE: &str = "Fritz-PlayAI";

/// Selector used when the user has not picked one.
pub const DEFAULT_VOICE: &str = "playai-tts|Fritz-PlayAI";

/// `error_type` a synthesis endpoint reports when its terms must be accepted
/// before it will speak.
pub const TERMS_REQUIRED_ERROR_TYPE: &str = "terms_required";

/// Errors from parsing an encoded voice selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// No `|` separating model and voice.
    #[error("voice selector '{0}' must have the form model|voice")]
    MissingSeparator(String),

    /// One side of the `|` is empty.
    #[error("voice selector '{0}' has an empty model or voice")]
    EmptyPart(String),
}

/// A synthesis model/voice pair, or speech disabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VoiceSelector {
    Disabled,
    Voice { model: String, voice: String },
}

impl VoiceSelector {
    /// Parse an encoded selector. Only the first `|` splits; any further
    /// `|` characters belong to the voice id.
    pub fn parse(encoded: &str) -> Result<Self, SelectorError> {
        if encoded == DISABLED_SENTINEL {
            return Ok(Self::Disabled);
        }

        let (model, voice) = encoded
            .split_once('|')
            .ok_or_else(|| SelectorError::MissingSeparator(encoded.to_string()))?;

        if model.is_empty() || voice.is_empty() {
            return Err(SelectorError::EmptyPart(encoded.to_string()));
        }

        Ok(Self::Voice {
            model: model.to_string(),
            voice: voice.to_string(),
        })
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// `(model, voice)` when speech is enabled.
    #[must_use]
    pub fn parts(&self) -> Option<(&str, &str)> {
        match self {
            Self::Disabled => None,
            Self::Voice { model, voice } => Some((model, voice)),
        }
    }
}

impl Default for VoiceSelector {
    fn default() -> Self {
        Self::Voice {
            model: DEFAULT_TTS_MODEL.to_string(),
            voice: DEFAULT_TTS_VOICE.to_string(),
        }
    }
}

impl FromStr for VoiceSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VoiceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str(DISABLED_SENTINEL),
            Self::Voice { model, voice } => write!(f, "{model}|{voice}"),
        }
    }
}

impl Serialize for VoiceSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VoiceSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
