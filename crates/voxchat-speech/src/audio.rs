//! Audio output port.
//!
//! The controller only ever talks to [`AudioOutput`]; the `rodio` adapter in
//! [`crate::audio_thread`] is one implementation, tests supply their own.

use crate::blob::ObjectUrl;
use crate::error::AudioError;

/// How a playback ended on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// All audio was played.
    Finished,
    /// The media engine gave up part way.
    Failed(String),
}

/// Callback fired at most once, when playback ends without being stopped.
pub type PlaybackDoneCallback = Box<dyn FnOnce(PlaybackOutcome) + Send + 'static>;

/// A sound that is currently playing.
pub trait ActivePlayback: Send {
    /// Halt playback and release the underlying resource. After this returns
    /// the done callback will not fire. Calling it twice is a no-op.
    fn stop(&mut self);
}

/// Something that can play an object URL.
pub trait AudioOutput: Send + Sync {
    /// Start playing the payload behind `url`.
    ///
    /// Must not block on the device. Failures known up front (unknown URL,
    /// dead output) are returned here; anything later, decode errors
    /// included, arrives as [`PlaybackOutcome::Failed`] through `on_done`.
    fn play(
        &self,
        url: &ObjectUrl,
        on_done: PlaybackDoneCallback,
    ) -> Result<Box<dyn ActivePlayback>, AudioError>;
}
