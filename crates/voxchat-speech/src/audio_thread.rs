//! `rodio` audio output on a dedicated OS thread.
//!
//! `rodio::OutputStream` is `!Send` on some platforms, so it is created on,
//! and never leaves, a single audio thread. [`RodioOutput`] is the
//! `Send + Sync` proxy: every operation becomes an [`AudioCommand`] sent to
//! that thread. Nothing on the caller's side waits for the audio thread;
//! decode and sink failures come back through the done callback as
//! [`PlaybackOutcome::Failed`].

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use bytes::Bytes;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::audio::{ActivePlayback, AudioOutput, PlaybackDoneCallback, PlaybackOutcome};
use crate::blob::{BlobStore, ObjectUrl};
use crate::error::AudioError;

// ── Commands ───────────────────────────────────────────────────────

enum AudioCommand {
    /// Decode `audio` and start it on a fresh sink.
    Play {
        id: u64,
        audio: Bytes,
        stopped: Arc<AtomicBool>,
        on_done: PlaybackDoneCallback,
    },

    /// Halt playback `id` (fire-and-forget).
    Stop { id: u64 },

    /// Playback `id` drained on its own; forget its sink.
    Ended { id: u64 },

    /// Release the output stream and exit.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// Audio output backed by the default system output device.
pub struct RodioOutput {
    blobs: BlobStore,
    cmd_tx: mpsc::Sender<AudioCommand>,
    next_id: AtomicU64,
    thread: Option<thread::JoinHandle<()>>,
}

impl RodioOutput {
    /// Spawn the audio thread and open the default output device.
    ///
    /// Object URLs passed to [`AudioOutput::play`] are resolved in `blobs`.
    pub fn spawn(blobs: BlobStore) -> Result<Self, AudioError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), AudioError>>();
        let loop_tx = cmd_tx.clone();

        let thread = thread::Builder::new()
            .name("voxchat-audio".into())
            .spawn(move || Self::run(&cmd_rx, &loop_tx, &init_tx))
            .map_err(|e| AudioError::OutputStream(format!("failed to spawn audio thread: {e}")))?;

        init_rx.recv().map_err(|_| AudioError::AudioThreadDied)??;
        tracing::info!("Audio output initialized on default output device");

        Ok(Self {
            blobs,
            cmd_tx,
            next_id: AtomicU64::new(1),
            thread: Some(thread),
        })
    }

    fn run(
        cmd_rx: &mpsc::Receiver<AudioCommand>,
        cmd_tx: &mpsc::Sender<AudioCommand>,
        init_tx: &mpsc::Sender<Result<(), AudioError>>,
    ) {
        // The stream must outlive every sink, so it lives for the whole loop.
        let (_stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = init_tx.send(Err(AudioError::OutputStream(e.to_string())));
                return;
            }
        };
        if init_tx.send(Ok(())).is_err() {
            return;
        }

        let mut sinks: HashMap<u64, Arc<Sink>> = HashMap::new();

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Play {
                    id,
                    audio,
                    stopped,
                    on_done,
                } => match start_sink(&stream_handle, audio) {
                    Ok(sink) => {
                        spawn_completion_watcher(
                            id,
                            Arc::clone(&sink),
                            stopped,
                            on_done,
                            cmd_tx.clone(),
                        );
                        sinks.insert(id, sink);
                        tracing::debug!(id, "Audio playback started");
                    }
                    Err(e) => {
                        tracing::warn!(id, error = %e, "Audio playback could not start");
                        report_start_failure(&stopped, on_done, &e);
                    }
                },

                AudioCommand::Stop { id } => {
                    if let Some(sink) = sinks.remove(&id) {
                        sink.stop();
                        tracing::debug!(id, "Audio playback stopped");
                    }
                }

                AudioCommand::Ended { id } => {
                    sinks.remove(&id);
                }

                AudioCommand::Shutdown => break,
            }
        }

        for sink in sinks.values() {
            sink.stop();
        }
        tracing::debug!("Audio thread shutting down");
    }
}

/// Decode a WAV payload into a rodio source.
fn decode(audio: Bytes) -> Result<Decoder<Cursor<Bytes>>, AudioError> {
    Decoder::new(Cursor::new(audio)).map_err(|e| AudioError::Decode(e.to_string()))
}

fn start_sink(stream_handle: &OutputStreamHandle, audio: Bytes) -> Result<Arc<Sink>, AudioError> {
    let source = decode(audio)?;
    let sink = Sink::try_new(stream_handle).map_err(|e| AudioError::OutputStream(e.to_string()))?;
    sink.append(source);
    Ok(Arc::new(sink))
}

/// Hand a start failure to `on_done`, unless the playback was stopped first.
fn report_start_failure(stopped: &AtomicBool, on_done: PlaybackDoneCallback, error: &AudioError) {
    if !stopped.swap(true, Ordering::SeqCst) {
        on_done(PlaybackOutcome::Failed(error.to_string()));
    }
}

/// Block a helper thread until `sink` drains. If nobody stopped it first,
/// report natural completion.
fn spawn_completion_watcher(
    id: u64,
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
    on_done: PlaybackDoneCallback,
    cmd_tx: mpsc::Sender<AudioCommand>,
) {
    thread::spawn(move || {
        // Returns early once `stop()` drops the queued sources.
        sink.sleep_until_end();

        if stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::debug!(id, "Playback finished naturally");
        let _ = cmd_tx.send(AudioCommand::Ended { id });
        on_done(PlaybackOutcome::Finished);
    });
}

impl AudioOutput for RodioOutput {
    fn play(
        &self,
        url: &ObjectUrl,
        on_done: PlaybackDoneCallback,
    ) -> Result<Box<dyn ActivePlayback>, AudioError> {
        let audio = self
            .blobs
            .resolve(url)
            .ok_or_else(|| AudioError::UnknownSource(url.to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stopped = Arc::new(AtomicBool::new(false));

        self.cmd_tx
            .send(AudioCommand::Play {
                id,
                audio,
                stopped: Arc::clone(&stopped),
                on_done,
            })
            .map_err(|_| AudioError::AudioThreadDied)?;

        Ok(Box::new(RodioPlayback {
            id,
            stopped,
            cmd_tx: self.cmd_tx.clone(),
        }))
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        // The thread may already be gone.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// One sound playing on the audio thread.
struct RodioPlayback {
    id: u64,
    stopped: Arc<AtomicBool>,
    cmd_tx: mpsc::Sender<AudioCommand>,
}

impl ActivePlayback for RodioPlayback {
    fn stop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            let _ = self.cmd_tx.send(AudioCommand::Stop { id: self.id });
        }
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Mono 16-bit PCM at 8 kHz holding `samples`.
    fn wav(samples: &[i16]) -> Bytes {
        let data_len = u32::try_from(samples.len() * 2).unwrap();
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&16_000u32.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        Bytes::from(out)
    }

    fn recording_callback() -> (PlaybackDoneCallback, Arc<Mutex<Vec<PlaybackOutcome>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: PlaybackDoneCallback = Box::new(move |outcome| {
            sink.lock().unwrap().push(outcome);
        });
        (callback, seen)
    }

    #[test]
    fn decodes_pcm_wav() {
        assert!(decode(wav(&[0, 1000, -1000, 0])).is_ok());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(Bytes::from_static(b"<html>not audio</html>"))
            .err()
            .expect("garbage must not decode");
        assert!(matches!(err, AudioError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn start_failure_is_reported_as_failed_outcome() {
        let stopped = AtomicBool::new(false);
        let (callback, seen) = recording_callback();

        report_start_failure(&stopped, callback, &AudioError::Decode("bad header".into()));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(&seen[0], PlaybackOutcome::Failed(reason) if reason.contains("bad header")));
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn start_failure_after_stop_is_silent() {
        let stopped = AtomicBool::new(true);
        let (callback, seen) = recording_callback();

        report_start_failure(&stopped, callback, &AudioError::Decode("bad header".into()));

        assert!(seen.lock().unwrap().is_empty());
    }
}
