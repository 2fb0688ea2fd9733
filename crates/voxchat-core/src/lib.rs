#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod render;
pub mod speech_text;

// Re-export commonly used types for convenience
pub use domain::{
    Conversation, DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE, DEFAULT_VOICE, DISABLED_SENTINEL, Message,
    MessageRole, SelectorError, TERMS_REQUIRED_ERROR_TYPE, VoiceSelector,
};
pub use render::{Pass, render};
pub use speech_text::{MAX_SYNTHESIS_CHARS, speech_text, truncate_for_synthesis};
