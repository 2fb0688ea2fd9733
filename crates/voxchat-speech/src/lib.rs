#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Dev-dependencies only used by the integration tests
#[cfg(test)]
use axum as _;

pub mod audio;
pub mod audio_thread;
pub mod blob;
pub mod config;
pub mod controller;
pub mod error;
pub mod synth;

// Re-export key types for convenience
pub use audio::{ActivePlayback, AudioOutput, PlaybackDoneCallback, PlaybackOutcome};
pub use audio_thread::RodioOutput;
pub use blob::{BlobStore, ObjectUrl};
pub use config::SpeechConfig;
pub use controller::{
    MessageId, PLAYBACK_FAILED_NOTICE, PlaybackController, PlaybackState, SYNTHESIS_FAILED_NOTICE,
    SpeechEvent, SpeechHandle, TERMS_REQUIRED_NOTICE, terms_required_notice,
};
pub use error::{AudioError, ConfigError, SynthesisError};
pub use synth::{
    HttpSynthesizer, SpeechSynthesizer, SynthesisErrorBody, SynthesisRequest,
    TERMS_REQUIRED_ERROR_TYPE,
};
