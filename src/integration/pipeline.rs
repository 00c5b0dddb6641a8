//! Session pipeline: one worker thread serializes every session action
//!
//! The interface talks to the session over a command channel and hears back
//! over an event channel. The worker owns the tokio runtime, the session,
//! the playback controller, and the capture controller; because it processes
//! one command at a time, nothing can race a gateway call or write into a
//! torn-down session.

use crate::audio::{AudioSink, NullSink, PlaybackController, PlaybackState};
use crate::config::AppConfig;
use crate::gateway::{ChatGateway, SpeechSynthesizer};
use crate::language::Language;
use crate::messages::{ConversationLog, ImageAttachment};
use crate::session::{ConversationSession, DataCategory, PatientInfo};
use crate::speech::{CaptureController, CaptureUpdate, ListeningState, SpeechRecognizer};
use crate::{Error, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Builds the audio sink on the worker thread; sinks are not `Send`
pub type SinkFactory = Box<dyn FnOnce() -> Result<Box<dyn AudioSink>> + Send>;

/// Builds the platform recognizer on the worker thread, if one exists
pub type RecognizerFactory = Box<dyn FnOnce() -> Option<Box<dyn SpeechRecognizer>> + Send>;

/// Sink factory producing a silent sink, for tests and headless runs
pub fn null_sink_factory() -> SinkFactory {
    Box::new(|| Ok(Box::new(NullSink::new(crate::audio::TTS_SAMPLE_RATE)) as Box<dyn AudioSink>))
}

/// Sink factory for the platform's default output device
#[cfg(feature = "audio-io")]
pub fn platform_sink_factory() -> SinkFactory {
    Box::new(|| {
        let sink = crate::audio::output::CpalSink::new()?;
        Ok(Box::new(sink) as Box<dyn AudioSink>)
    })
}

/// Commands the interface sends to the session worker
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Submit free-text input, optionally with a staged image
    Submit {
        text: String,
        attachment: Option<ImageAttachment>,
    },

    /// Submit a structured data value under its category header
    SubmitData { category: DataCategory, value: String },

    /// Request a formal diagnostic document
    RequestDocument,

    /// Toggle spoken playback of a message's text
    Play { id: Uuid, text: String },

    /// Halt playback unconditionally
    StopPlayback,

    /// Toggle speech capture into the draft
    ToggleCapture,

    /// Switch the interface language
    SetLanguage(Language),

    /// Record the patient profile before the conversation starts
    SetPatient(PatientInfo),

    /// Tear the session down
    EndSession,

    /// Shut the worker down
    Shutdown,
}

/// Events the worker emits back to the interface
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Worker is up. Carries the shared log handle the interface renders
    /// from; appends show up in it live.
    Ready { log: ConversationLog },

    /// A gateway request started or finished
    LoadingChanged(bool),

    /// Playback state changed
    PlaybackChanged(PlaybackState),

    /// Speech capture started or stopped
    ListeningChanged(ListeningState),

    /// Accumulated capture transcript so far
    Transcript(String),

    /// Capture was requested but no recognition engine exists
    CaptureUnavailable,

    /// Whether a submitted patient profile was accepted
    PatientAccepted(bool),

    /// The session was torn down
    SessionEnded,

    /// Something failed; carries a user-facing description
    Error(String),

    /// Worker has shut down
    Shutdown,
}

/// Channel-based session pipeline
pub struct SessionPipeline {
    config: AppConfig,
    gateway: Arc<dyn ChatGateway>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sink_factory: SinkFactory,
    recognizer_factory: RecognizerFactory,
    command_tx: Sender<SessionCommand>,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
    event_rx: Receiver<SessionEvent>,
}

impl SessionPipeline {
    pub fn new(
        config: AppConfig,
        gateway: Arc<dyn ChatGateway>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        sink_factory: SinkFactory,
        recognizer_factory: RecognizerFactory,
    ) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            config,
            gateway,
            synthesizer,
            sink_factory,
            recognizer_factory,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<SessionCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<SessionEvent> {
        self.event_rx.clone()
    }

    /// Start the worker thread that owns the session.
    pub fn start_worker(self) -> Result<()> {
        let config = self.config;
        let gateway = self.gateway;
        let synthesizer = self.synthesizer;
        let sink_factory = self.sink_factory;
        let recognizer_factory = self.recognizer_factory;
        let command_rx = self.command_rx;
        let event_tx = self.event_tx;

        std::thread::Builder::new()
            .name("session-worker".to_string())
            .spawn(move || {
                info!("Session worker starting");

                let runtime = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        let _ = event_tx.send(SessionEvent::Error(
                            Error::Channel(e.to_string())
                                .user_message(config.language)
                                .to_string(),
                        ));
                        let _ = event_tx.send(SessionEvent::Shutdown);
                        return;
                    }
                };

                let sink = match sink_factory() {
                    Ok(sink) => sink,
                    Err(e) => {
                        // Keep the conversation alive without audio output
                        warn!("Audio sink unavailable, playback disabled: {}", e);
                        let _ = event_tx.send(SessionEvent::Error(
                            e.user_message(config.language).to_string(),
                        ));
                        Box::new(NullSink::new(crate::audio::TTS_SAMPLE_RATE)) as Box<dyn AudioSink>
                    }
                };

                let mut session = ConversationSession::new(gateway, config.language);
                let mut playback = PlaybackController::new(synthesizer, sink);
                let mut capture = CaptureController::new(recognizer_factory());

                let _ = event_tx.send(SessionEvent::Ready {
                    log: session.log_handle(),
                });
                info!("Session worker ready");

                let mut last_playback = playback.state();

                loop {
                    match command_rx.recv_timeout(Duration::from_millis(50)) {
                        Ok(command) => {
                            if !handle_command(
                                command,
                                &runtime,
                                &mut session,
                                &mut playback,
                                &mut capture,
                                &mut last_playback,
                                &event_tx,
                            ) {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => {
                            debug!("Command channel closed");
                            break;
                        }
                    }

                    playback.poll();
                    if playback.state() != last_playback {
                        last_playback = playback.state();
                        let _ = event_tx.send(SessionEvent::PlaybackChanged(last_playback));
                    }

                    for update in capture.poll() {
                        match update {
                            CaptureUpdate::Transcript(text) => {
                                let _ = event_tx.send(SessionEvent::Transcript(text));
                            }
                            CaptureUpdate::Stopped => {
                                let _ = event_tx
                                    .send(SessionEvent::ListeningChanged(ListeningState::Idle));
                            }
                        }
                    }
                }

                playback.stop();
                capture.stop();
                let _ = event_tx.send(SessionEvent::Shutdown);
                info!("Session worker stopped");
            })
            .map_err(|e| Error::Channel(format!("Failed to spawn session worker: {}", e)))?;

        Ok(())
    }
}

/// Process one command. Returns false when the worker should exit.
///
/// `last_playback` is the worker loop's record of the last playback state it
/// reported; every direct `PlaybackChanged` emission here updates it so the
/// loop's change check stays in sync and natural completion is still seen.
fn handle_command(
    command: SessionCommand,
    runtime: &Runtime,
    session: &mut ConversationSession,
    playback: &mut PlaybackController,
    capture: &mut CaptureController,
    last_playback: &mut PlaybackState,
    event_tx: &Sender<SessionEvent>,
) -> bool {
    match command {
        SessionCommand::Submit { text, attachment } => {
            let _ = event_tx.send(SessionEvent::LoadingChanged(true));
            runtime.block_on(session.submit_message(&text, attachment));
            let _ = event_tx.send(SessionEvent::LoadingChanged(false));
        }

        SessionCommand::SubmitData { category, value } => {
            let _ = event_tx.send(SessionEvent::LoadingChanged(true));
            runtime.block_on(session.submit_structured_data(category, &value));
            let _ = event_tx.send(SessionEvent::LoadingChanged(false));
        }

        SessionCommand::RequestDocument => {
            let _ = event_tx.send(SessionEvent::LoadingChanged(true));
            runtime.block_on(session.request_formal_document());
            let _ = event_tx.send(SessionEvent::LoadingChanged(false));
        }

        SessionCommand::Play { id, text } => {
            if let Err(e) = runtime.block_on(playback.play(id, &text)) {
                warn!("Playback failed: {}", e);
                let _ = event_tx.send(SessionEvent::Error(
                    e.user_message(session.language()).to_string(),
                ));
            }
            *last_playback = playback.state();
            let _ = event_tx.send(SessionEvent::PlaybackChanged(*last_playback));
        }

        SessionCommand::StopPlayback => {
            playback.stop();
            *last_playback = playback.state();
            let _ = event_tx.send(SessionEvent::PlaybackChanged(*last_playback));
        }

        SessionCommand::ToggleCapture => match capture.toggle(session.language()) {
            Ok(state) => {
                let _ = event_tx.send(SessionEvent::ListeningChanged(state));
            }
            Err(Error::CapabilityUnavailable) => {
                let _ = event_tx.send(SessionEvent::CaptureUnavailable);
            }
            Err(e) => {
                warn!("Capture toggle failed: {}", e);
                let _ = event_tx.send(SessionEvent::Error(
                    e.user_message(session.language()).to_string(),
                ));
            }
        },

        SessionCommand::SetLanguage(language) => {
            session.set_language(language);
        }

        SessionCommand::SetPatient(patient) => {
            let accepted = session.set_patient(patient);
            let _ = event_tx.send(SessionEvent::PatientAccepted(accepted));
        }

        SessionCommand::EndSession => {
            // Stop the peripherals before the log disappears under them
            playback.stop();
            capture.stop();
            session.end_session();
            *last_playback = playback.state();
            let _ = event_tx.send(SessionEvent::PlaybackChanged(*last_playback));
            let _ = event_tx.send(SessionEvent::ListeningChanged(capture.state()));
            let _ = event_tx.send(SessionEvent::SessionEnded);
        }

        SessionCommand::Shutdown => {
            info!("Session worker shutting down");
            return false;
        }
    }
    true
}
