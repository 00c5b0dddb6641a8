//! Single-flight audio playback
//!
//! At most one message's audio plays at a time. Requesting playback for the
//! message that is already playing toggles it off; requesting a different
//! message hard-stops the current one and starts the new. Synthesis failure
//! is silent: the state simply returns to idle.

use crate::audio::output::AudioSink;
use crate::audio::pcm::{decode_pcm16, TTS_SAMPLE_RATE};
use crate::audio::resampler::resample_mono;
use crate::gateway::SpeechSynthesizer;
use crate::Result;
use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Playback state: at most one message id may be playing system-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing(Uuid),
}

pub struct PlaybackController {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sink: Box<dyn AudioSink>,
    state: PlaybackState,
    completion: Option<Receiver<()>>,
}

impl PlaybackController {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, sink: Box<dyn AudioSink>) -> Self {
        Self {
            synthesizer,
            sink,
            state: PlaybackState::Idle,
            completion: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Request playback of a message's text.
    ///
    /// Toggles off when `id` is already playing; otherwise stops whatever
    /// plays and synthesizes the new text. A `None` from synthesis returns
    /// to idle without error.
    pub async fn play(&mut self, id: Uuid, text: &str) -> Result<()> {
        if let PlaybackState::Playing(current) = self.state {
            self.stop();
            if current == id {
                debug!("Toggled playback off for {}", id);
                return Ok(());
            }
        }

        self.state = PlaybackState::Playing(id);

        let payload = match self.synthesizer.synthesize(text).await {
            Some(payload) => payload,
            None => {
                // Synthesis failure is non-fatal to the conversation
                self.state = PlaybackState::Idle;
                return Ok(());
            }
        };

        let audio = match decode_pcm16(&payload, TTS_SAMPLE_RATE) {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Discarding undecodable synthesis payload: {}", e);
                self.state = PlaybackState::Idle;
                return Ok(());
            }
        };

        let device_rate = self.sink.sample_rate();
        let samples = match resample_mono(&audio.samples, audio.sample_rate, device_rate) {
            Ok(samples) => samples,
            Err(e) => {
                self.state = PlaybackState::Idle;
                return Err(e);
            }
        };

        match self.sink.start(crate::audio::pcm::AudioData {
            samples,
            sample_rate: device_rate,
        }) {
            Ok(done_rx) => {
                self.completion = Some(done_rx);
                Ok(())
            }
            Err(e) => {
                self.state = PlaybackState::Idle;
                Err(e)
            }
        }
    }

    /// Unconditionally halt playback; safe when already idle
    pub fn stop(&mut self) {
        self.sink.stop();
        self.completion = None;
        self.state = PlaybackState::Idle;
    }

    /// Advance the state machine: transitions to idle exactly once when the
    /// sink reports natural completion (or goes away).
    pub fn poll(&mut self) {
        let finished = match &self.completion {
            Some(rx) => match rx.try_recv() {
                Ok(()) => true,
                Err(TryRecvError::Disconnected) => true,
                Err(TryRecvError::Empty) => false,
            },
            None => false,
        };

        if finished {
            // Tear the sink down too; a drained device stream would otherwise
            // keep running and feed silence until the next start
            self.sink.stop();
            self.completion = None;
            self.state = PlaybackState::Idle;
        }
    }
}
