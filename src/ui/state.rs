//! Application state management
//!
//! Central state for the interface. All session mutation goes through the
//! command channel to the worker; the state here is what the worker reports
//! back plus purely local concerns like the draft text and open dialogs.

use crate::audio::PlaybackState;
use crate::config::AppConfig;
use crate::integration::{SessionCommand, SessionEvent};
use crate::language::Language;
use crate::messages::{ConversationLog, ImageAttachment};
use crate::session::{DataCategory, PatientInfo};
use crate::speech::ListeningState;
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};
use uuid::Uuid;

/// Which screen the interface is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Landing screen with language selection and the start button
    Start,
    /// Mandatory patient profile form, when configured
    PatientForm,
    /// The consultation itself
    Chat,
}

/// In-progress patient profile form
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub error: Option<String>,
}

impl PatientForm {
    fn to_info(&self) -> PatientInfo {
        PatientInfo {
            name: self.name.trim().to_string(),
            age: self.age.trim().to_string(),
            gender: self.gender.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

/// Open structured-data entry dialog
#[derive(Debug, Clone)]
pub struct DataEntry {
    pub category: DataCategory,
    pub value: String,
}

/// Central application state
pub struct AppState {
    /// Resolved startup configuration
    pub config: AppConfig,

    /// Current screen
    pub screen: Screen,

    /// Interface language; mirrored to the session on change
    pub language: Language,

    /// Shared log handle from the worker, once it is up
    pub log: Option<ConversationLog>,

    /// Current draft text
    pub input_text: String,

    /// Image staged for the next message
    pub staged_attachment: Option<ImageAttachment>,

    /// Whether a gateway request is in flight
    pub is_loading: bool,

    /// Current playback state as reported by the worker
    pub playback: PlaybackState,

    /// Current capture state as reported by the worker
    pub listening: ListeningState,

    /// Whether the capture-unavailable notice is showing
    pub capture_notice: bool,

    /// Patient profile form contents
    pub patient_form: PatientForm,

    /// Open data entry dialog, if any
    pub data_entry: Option<DataEntry>,

    /// Whether the end-session confirmation dialog is showing
    pub confirm_end: bool,

    /// Last error message, shown until dismissed
    pub last_error: Option<String>,

    /// Channel to send session commands
    pub command_tx: Option<Sender<SessionCommand>>,

    /// Channel to receive session events
    pub event_rx: Option<Receiver<SessionEvent>>,

    /// Draft snapshot taken when capture started; transcripts are joined
    /// onto this rather than onto whatever the draft has become
    capture_base: String,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let language = config.language;
        Self {
            config,
            screen: Screen::Start,
            language,
            log: None,
            input_text: String::new(),
            staged_attachment: None,
            is_loading: false,
            playback: PlaybackState::Idle,
            listening: ListeningState::Idle,
            capture_notice: false,
            patient_form: PatientForm::default(),
            data_entry: None,
            confirm_end: false,
            last_error: None,
            command_tx: None,
            event_rx: None,
            capture_base: String::new(),
        }
    }

    /// Attach the pipeline channels
    pub fn connect(&mut self, command_tx: Sender<SessionCommand>, event_rx: Receiver<SessionEvent>) {
        self.command_tx = Some(command_tx);
        self.event_rx = Some(event_rx);
    }

    fn send(&self, command: SessionCommand) {
        if let Some(tx) = &self.command_tx {
            if let Err(e) = tx.send(command) {
                warn!("Session worker is gone: {}", e);
            }
        }
    }

    /// The message id currently playing, if any
    pub fn playing_id(&self) -> Option<Uuid> {
        match self.playback {
            PlaybackState::Playing(id) => Some(id),
            PlaybackState::Idle => None,
        }
    }

    /// Process incoming events from the session worker
    pub fn poll_events(&mut self) {
        let Some(rx) = self.event_rx.clone() else {
            return;
        };

        while let Ok(event) = rx.try_recv() {
            match event {
                SessionEvent::Ready { log } => {
                    debug!("Session worker ready");
                    self.log = Some(log);
                }
                SessionEvent::LoadingChanged(loading) => {
                    self.is_loading = loading;
                }
                SessionEvent::PlaybackChanged(state) => {
                    self.playback = state;
                }
                SessionEvent::ListeningChanged(state) => {
                    self.listening = state;
                }
                SessionEvent::Transcript(text) => {
                    self.input_text = self.language.join_transcript(&self.capture_base, &text);
                }
                SessionEvent::CaptureUnavailable => {
                    self.capture_notice = true;
                    self.listening = ListeningState::Idle;
                }
                SessionEvent::PatientAccepted(accepted) => {
                    if !accepted {
                        warn!("Patient profile was rejected by the session");
                    }
                }
                SessionEvent::SessionEnded => {
                    self.reset_to_start();
                }
                SessionEvent::Error(message) => {
                    self.last_error = Some(message);
                }
                SessionEvent::Shutdown => {
                    debug!("Session worker shut down");
                }
            }
        }
    }

    fn reset_to_start(&mut self) {
        self.screen = Screen::Start;
        self.input_text.clear();
        self.staged_attachment = None;
        self.is_loading = false;
        self.playback = PlaybackState::Idle;
        self.listening = ListeningState::Idle;
        self.patient_form = PatientForm::default();
        self.data_entry = None;
        self.confirm_end = false;
    }

    /// Leave the start screen. Goes through the patient form when the
    /// configuration requires one.
    pub fn begin_session(&mut self) {
        if !self.config.can_start() {
            self.last_error = Some(self.language.ui().missing_key_hint.to_string());
            return;
        }
        self.screen = if self.config.require_patient_form {
            Screen::PatientForm
        } else {
            Screen::Chat
        };
    }

    /// Validate and submit the patient form, then enter the chat
    pub fn submit_patient_form(&mut self) {
        let info = self.patient_form.to_info();
        match info.validate() {
            Ok(()) => {
                self.patient_form.error = None;
                self.send(SessionCommand::SetPatient(info));
                self.screen = Screen::Chat;
            }
            Err(e) => {
                self.patient_form.error = Some(e.user_message(self.language).to_string());
            }
        }
    }

    /// Send the current draft and staged image
    pub fn send_message(&mut self) {
        if self.is_loading {
            return;
        }
        let text = self.input_text.trim().to_string();
        let attachment = self.staged_attachment.take();
        if text.is_empty() && attachment.is_none() {
            return;
        }

        self.send(SessionCommand::Submit { text, attachment });
        self.input_text.clear();
        self.capture_base.clear();
    }

    /// Submit the open data entry dialog's value
    pub fn submit_data_entry(&mut self) {
        let Some(entry) = self.data_entry.take() else {
            return;
        };
        if entry.value.trim().is_empty() {
            return;
        }
        self.send(SessionCommand::SubmitData {
            category: entry.category,
            value: entry.value,
        });
    }

    /// Open the data entry dialog for a category
    pub fn open_data_entry(&mut self, category: DataCategory) {
        self.data_entry = Some(DataEntry {
            category,
            value: String::new(),
        });
    }

    /// Ask for a formal diagnostic document
    pub fn request_document(&mut self) {
        if self.is_loading {
            return;
        }
        self.send(SessionCommand::RequestDocument);
    }

    /// Toggle spoken playback of a message
    pub fn toggle_play(&mut self, id: Uuid, text: &str) {
        self.send(SessionCommand::Play {
            id,
            text: text.to_string(),
        });
    }

    /// Toggle speech capture into the draft
    pub fn toggle_capture(&mut self) {
        if self.listening == ListeningState::Idle {
            self.capture_base = self.input_text.clone();
        }
        self.send(SessionCommand::ToggleCapture);
    }

    /// Switch the interface language
    pub fn set_language(&mut self, language: Language) {
        if self.language == language {
            return;
        }
        self.language = language;
        self.send(SessionCommand::SetLanguage(language));
    }

    /// Tear the session down after confirmation
    pub fn end_session(&mut self) {
        self.confirm_end = false;
        self.send(SessionCommand::EndSession);
    }

    /// Stop the worker; called on application exit
    pub fn shutdown(&mut self) {
        self.send(SessionCommand::Shutdown);
    }
}
