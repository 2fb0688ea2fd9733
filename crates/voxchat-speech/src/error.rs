//! Speech error types.

/// Errors from the synthesis endpoint.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The endpoint needs a one-time terms acceptance before it will speak.
    #[error("Speech terms not accepted: {message}")]
    TermsRequired { message: String },

    /// The endpoint answered with a non-success status.
    #[error("Synthesis rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never got a usable answer (connect, timeout, body read).
    #[error("Synthesis request failed: {0}")]
    Transport(String),

    /// Nothing left to say once markup was stripped.
    #[error("No speakable text")]
    EmptyText,
}

impl SynthesisError {
    /// Stable discriminant, matching the endpoint's `error_type` values.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TermsRequired { .. } => "terms_required",
            Self::Rejected { .. } => "rejected",
            Self::Transport(_) => "transport",
            Self::EmptyText => "empty_text",
        }
    }
}

/// Errors from audio output.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// No output device, or the output stream could not be opened.
    #[error("Failed to open audio output stream: {0}")]
    OutputStream(String),

    /// The payload is not a format the decoder understands.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// The object URL was revoked or never existed.
    #[error("No audio behind {0}")]
    UnknownSource(String),

    /// The audio thread exited unexpectedly.
    #[error("Audio thread is not running")]
    AudioThreadDied,
}

/// Errors from reading speech configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
