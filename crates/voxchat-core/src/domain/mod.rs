//! Domain types for voxchat.
//!
//! These types describe what the chat client shows and speaks, independent of
//! any rendering or transport concerns.

mod chat;
mod voice;

pub use chat::{Conversation, Message, MessageRole};
pub use voice::{
    DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE, DEFAULT_VOICE, DISABLED_SENTINEL, SelectorError,
    TERMS_REQUIRED_ERROR_TYPE, VoiceSelector,
};
