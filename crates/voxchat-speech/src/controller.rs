//! Speech playback controller.
//!
//! Owns the single "currently speaking" slot. Callers only ever go through
//! [`PlaybackController::toggle`] and [`PlaybackController::stop`]; results
//! from the synthesis task and the audio output come back as completions
//! tagged with the generation of the session that produced them, and a
//! completion whose generation is no longer live is dropped.

use std::mem;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use voxchat_core::{VoiceSelector, speech_text};

use crate::audio::{ActivePlayback, AudioOutput, PlaybackDoneCallback, PlaybackOutcome};
use crate::blob::{BlobStore, ObjectUrl};
use crate::error::SynthesisError;
use crate::synth::{SpeechSynthesizer, SynthesisRequest};

/// Identifier of the chat message a playback belongs to.
pub type MessageId = String;

/// Headline of the notice shown when the endpoint wants its terms accepted.
pub const TERMS_REQUIRED_NOTICE: &str = "TTS Setup Required";

/// Notice for every other synthesis failure.
pub const SYNTHESIS_FAILED_NOTICE: &str = "Failed to generate speech. Please try again.";

/// Notice for audio that was synthesized but could not be played.
pub const PLAYBACK_FAILED_NOTICE: &str = "Audio playback failed. Please try again.";

// ── State and events ───────────────────────────────────────────────

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    /// Nothing requested or playing.
    #[default]
    Idle,

    /// Waiting for the synthesis endpoint.
    Requesting,

    /// Audio is playing.
    Playing,
}

/// Events emitted to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Controller state changed.
    StateChanged(PlaybackState),

    /// Audio for this message started playing.
    Started(MessageId),

    /// This message's request or playback was torn down before it ended.
    Stopped(MessageId),

    /// Audio for this message played to the end.
    Finished(MessageId),

    /// A one-off user-facing message about a failure.
    Notice(String),
}

/// Full text of the terms-required notice, embedding the endpoint's detail.
#[must_use]
pub fn terms_required_notice(detail: &str) -> String {
    format!(
        "{TERMS_REQUIRED_NOTICE}\n\n{detail}\n\n\
         This is a one-time setup. After accepting terms, reload and try again."
    )
}

// ── Internal bookkeeping ───────────────────────────────────────────

struct PlaybackSession {
    generation: u64,
    message_id: MessageId,
    url: ObjectUrl,
    playback: Box<dyn ActivePlayback>,
}

enum Slot {
    Idle,
    Requesting {
        generation: u64,
        message_id: MessageId,
        task: JoinHandle<()>,
    },
    Playing(PlaybackSession),
}

impl Slot {
    const fn state(&self) -> PlaybackState {
        match self {
            Self::Idle => PlaybackState::Idle,
            Self::Requesting { .. } => PlaybackState::Requesting,
            Self::Playing(_) => PlaybackState::Playing,
        }
    }

    fn message_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Requesting { message_id, .. } => Some(message_id),
            Self::Playing(session) => Some(&session.message_id),
        }
    }
}

enum Completion {
    Synthesized {
        generation: u64,
        result: Result<bytes::Bytes, SynthesisError>,
    },
    Ended {
        generation: u64,
        outcome: PlaybackOutcome,
    },
}

enum Command {
    Toggle {
        message_id: MessageId,
        html: String,
        selector: VoiceSelector,
    },
    Stop,
}

// ── Controller ─────────────────────────────────────────────────────

/// Single-flight speech playback.
///
/// At most one session is live at a time. Any new request tears the previous
/// one down (task aborted or audio stopped, object URL revoked) before the
/// synthesis request is issued.
///
/// Must be used from within a tokio runtime: [`toggle`](Self::toggle) spawns
/// the synthesis request as a task.
pub struct PlaybackController {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    output: Arc<dyn AudioOutput>,
    blobs: BlobStore,
    slot: Slot,
    reported: PlaybackState,
    next_generation: u64,
    active_tx: watch::Sender<Option<MessageId>>,
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl PlaybackController {
    /// Create a controller.
    ///
    /// Returns the controller and a receiver for [`SpeechEvent`]s. `blobs`
    /// must be the store `output` resolves object URLs in.
    #[must_use]
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        output: Arc<dyn AudioOutput>,
        blobs: BlobStore,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (active_tx, _) = watch::channel(None);

        let controller = Self {
            synthesizer,
            output,
            blobs,
            slot: Slot::Idle,
            reported: PlaybackState::Idle,
            next_generation: 0,
            active_tx,
            event_tx,
            completion_tx,
            completion_rx,
        };

        (controller, event_rx)
    }

    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.slot.state()
    }

    /// Message whose speech is currently requested or playing.
    #[must_use]
    pub fn active_message(&self) -> Option<&str> {
        self.slot.message_id()
    }

    /// Observe the active message id.
    #[must_use]
    pub fn subscribe_active(&self) -> watch::Receiver<Option<MessageId>> {
        self.active_tx.subscribe()
    }

    /// Play `message_id`, or stop it if it is the one already active.
    ///
    /// Whatever is live is torn down first. `html` is rendered message
    /// content; it is reduced to plain text before being sent.
    pub fn toggle(&mut self, message_id: &str, html: &str, selector: &VoiceSelector) {
        if self.teardown().as_deref() == Some(message_id) {
            tracing::debug!(message_id, "Speech toggled off");
            self.publish();
            return;
        }

        let Some((model, voice)) = selector.parts() else {
            tracing::warn!(message_id, "Speech requested with voice output disabled; ignoring");
            self.publish();
            return;
        };

        let text = speech_text(html);
        if text.is_empty() {
            self.report_synthesis_failure(message_id, &SynthesisError::EmptyText);
            self.publish();
            return;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let request = SynthesisRequest {
            text,
            model: model.to_string(),
            voice: voice.to_string(),
        };

        tracing::debug!(message_id, generation, model, voice, "Requesting speech");

        // The indicator goes up before the request leaves.
        self.set_active(Some(message_id.to_string()));

        let synthesizer = Arc::clone(&self.synthesizer);
        let completions = self.completion_tx.clone();
        let task = tokio::spawn(async move {
            let result = synthesizer.synthesize(&request).await;
            let _ = completions.send(Completion::Synthesized { generation, result });
        });

        self.slot = Slot::Requesting {
            generation,
            message_id: message_id.to_string(),
            task,
        };
        self.publish();
    }

    /// Tear down whatever is live and return to [`PlaybackState::Idle`].
    pub fn stop(&mut self) {
        if let Some(message_id) = self.teardown() {
            tracing::debug!(message_id = %message_id, "Speech stopped");
        }
        self.publish();
    }

    /// Wait for the next completion and apply it.
    pub async fn process_next(&mut self) {
        if let Some(completion) = self.completion_rx.recv().await {
            self.apply(completion);
        }
    }

    /// Process completions until no synthesis request is pending.
    pub async fn settle(&mut self) {
        while self.state() == PlaybackState::Requesting {
            self.process_next().await;
        }
    }

    /// Process completions until the controller is idle.
    pub async fn wait_idle(&mut self) {
        while self.state() != PlaybackState::Idle {
            self.process_next().await;
        }
    }

    /// Move the controller onto its own task.
    ///
    /// The task ends, stopping any playback, once every handle is dropped.
    #[must_use]
    pub fn spawn(self) -> SpeechHandle {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let active = self.subscribe_active();
        tokio::spawn(self.run(command_rx));
        SpeechHandle { commands, active }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Toggle { message_id, html, selector }) => {
                        self.toggle(&message_id, &html, &selector);
                    }
                    Some(Command::Stop) => self.stop(),
                    None => break,
                },
                Some(completion) = self.completion_rx.recv() => self.apply(completion),
            }
        }

        self.stop();
        tracing::debug!("Speech controller shut down");
    }

    // ── Transitions ────────────────────────────────────────────────

    /// Empty the slot, releasing whatever it held. Returns the message id
    /// that was active.
    fn teardown(&mut self) -> Option<MessageId> {
        let message_id = match mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Idle => return None,
            Slot::Requesting {
                message_id, task, ..
            } => {
                task.abort();
                message_id
            }
            Slot::Playing(mut session) => {
                session.playback.stop();
                self.blobs.revoke(&session.url);
                session.message_id
            }
        };
        self.emit(SpeechEvent::Stopped(message_id.clone()));
        Some(message_id)
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Synthesized { generation, result } => {
                let Some(message_id) = self.take_requesting(generation) else {
                    tracing::debug!(generation, "Dropping stale synthesis result");
                    return;
                };
                match result {
                    Ok(audio) => self.start_playback(generation, message_id, audio),
                    Err(e) => self.report_synthesis_failure(&message_id, &e),
                }
            }
            Completion::Ended {
                generation,
                outcome,
            } => {
                let Some(mut session) = self.take_playing(generation) else {
                    tracing::debug!(generation, "Dropping stale playback end");
                    return;
                };
                session.playback.stop();
                self.blobs.revoke(&session.url);
                match outcome {
                    PlaybackOutcome::Finished => {
                        tracing::debug!(message_id = %session.message_id, "Speech finished");
                        self.emit(SpeechEvent::Finished(session.message_id));
                    }
                    PlaybackOutcome::Failed(reason) => {
                        tracing::warn!(message_id = %session.message_id, %reason, "Audio playback error");
                        self.emit(SpeechEvent::Notice(PLAYBACK_FAILED_NOTICE.to_string()));
                    }
                }
            }
        }
        self.publish();
    }

    fn start_playback(&mut self, generation: u64, message_id: MessageId, audio: bytes::Bytes) {
        let url = self.blobs.create(audio);
        let completions = self.completion_tx.clone();
        let on_done: PlaybackDoneCallback = Box::new(move |outcome| {
            let _ = completions.send(Completion::Ended {
                generation,
                outcome,
            });
        });

        match self.output.play(&url, on_done) {
            Ok(playback) => {
                tracing::debug!(message_id = %message_id, generation, url = %url, "Speech playing");
                self.emit(SpeechEvent::Started(message_id.clone()));
                self.slot = Slot::Playing(PlaybackSession {
                    generation,
                    message_id,
                    url,
                    playback,
                });
            }
            Err(e) => {
                tracing::warn!(message_id = %message_id, error = %e, "Could not start audio playback");
                self.blobs.revoke(&url);
                self.emit(SpeechEvent::Notice(PLAYBACK_FAILED_NOTICE.to_string()));
            }
        }
    }

    fn report_synthesis_failure(&self, message_id: &str, error: &SynthesisError) {
        tracing::warn!(message_id, kind = error.kind(), error = %error, "Speech synthesis failed");
        let notice = match error {
            SynthesisError::TermsRequired { message } => terms_required_notice(message),
            _ => SYNTHESIS_FAILED_NOTICE.to_string(),
        };
        self.emit(SpeechEvent::Notice(notice));
    }

    fn take_requesting(&mut self, generation: u64) -> Option<MessageId> {
        if !matches!(&self.slot, Slot::Requesting { generation: live, .. } if *live == generation) {
            return None;
        }
        match mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Requesting { message_id, .. } => Some(message_id),
            other => {
                self.slot = other;
                None
            }
        }
    }

    fn take_playing(&mut self, generation: u64) -> Option<PlaybackSession> {
        if !matches!(&self.slot, Slot::Playing(session) if session.generation == generation) {
            return None;
        }
        match mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Playing(session) => Some(session),
            other => {
                self.slot = other;
                None
            }
        }
    }

    /// Report state and active-id changes since the last call.
    fn publish(&mut self) {
        let state = self.slot.state();
        if state != self.reported {
            self.reported = state;
            self.emit(SpeechEvent::StateChanged(state));
        }

        self.set_active(self.slot.message_id().map(str::to_string));
    }

    fn set_active(&self, active: Option<MessageId>) {
        self.active_tx.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        });
    }

    fn emit(&self, event: SpeechEvent) {
        // Nobody listening is fine.
        let _ = self.event_tx.send(event);
    }
}

// ── Handle ─────────────────────────────────────────────────────────

/// Cloneable handle to a controller running on its own task.
#[derive(Clone)]
pub struct SpeechHandle {
    commands: mpsc::UnboundedSender<Command>,
    active: watch::Receiver<Option<MessageId>>,
}

impl SpeechHandle {
    /// See [`PlaybackController::toggle`].
    pub fn toggle(
        &self,
        message_id: impl Into<MessageId>,
        html: impl Into<String>,
        selector: VoiceSelector,
    ) {
        self.send(Command::Toggle {
            message_id: message_id.into(),
            html: html.into(),
            selector,
        });
    }

    /// See [`PlaybackController::stop`].
    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    /// Observe the active message id.
    #[must_use]
    pub fn active(&self) -> watch::Receiver<Option<MessageId>> {
        self.active.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Speech controller is no longer running");
        }
    }
}

impl std::fmt::Debug for SpeechHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechHandle")
            .field("active", &*self.active.borrow())
            .finish_non_exhaustive()
    }
}
