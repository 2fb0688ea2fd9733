//! Speak command handler.
//!
//! Renders the reply exactly as the chat view would, then hands the HTML to a
//! `PlaybackController` and waits for the session to end.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use voxchat_core::VoiceSelector;
use voxchat_speech::{
    BlobStore, HttpSynthesizer, PlaybackController, RodioOutput, SpeechConfig, SpeechEvent,
};

use super::input::read_input;

/// Message id used for the single message spoken from the command line.
const CLI_MESSAGE_ID: &str = "cli";

/// Pick the voice: `--voice` wins over `VOXCHAT_VOICE`.
pub fn resolve_voice(arg: Option<&str>, config: &SpeechConfig) -> Result<VoiceSelector> {
    let selector = match arg {
        Some(raw) => VoiceSelector::parse(raw).context("Invalid --voice")?,
        None => config.default_voice.clone(),
    };
    if selector.is_disabled() {
        bail!("Voice output is disabled; pass --voice model|voice to speak");
    }
    Ok(selector)
}

/// Speak `file` (or stdin) through the default output device.
pub async fn execute(file: Option<&Path>, voice: Option<&str>) -> Result<()> {
    let text = read_input(file)?;
    let html = voxchat_core::render(&text);

    let config = SpeechConfig::from_env()?;
    let selector = resolve_voice(voice, &config)?;

    let blobs = BlobStore::new();
    let synthesizer = HttpSynthesizer::new(&config)?;
    tracing::info!(endpoint = %synthesizer.endpoint(), voice = %selector, "Speaking");

    let output = RodioOutput::spawn(blobs.clone())?;
    let (mut controller, mut events) =
        PlaybackController::new(Arc::new(synthesizer), Arc::new(output), blobs);

    controller.toggle(CLI_MESSAGE_ID, &html, &selector);

    tokio::select! {
        () = controller.wait_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            controller.stop();
        }
    }

    while let Ok(event) = events.try_recv() {
        if let SpeechEvent::Notice(notice) = event {
            bail!(notice);
        }
    }
    Ok(())
}
