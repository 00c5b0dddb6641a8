//! End-to-end tests of the session pipeline
//!
//! Drive the worker over its channels with a scripted gateway and a silent
//! audio sink, the way the interface does, and assert on the events and the
//! shared log.

use async_trait::async_trait;
use medgrid::config::AppConfig;
use medgrid::gateway::{ChatGateway, SpeechSynthesizer};
use medgrid::integration::{
    null_sink_factory, SessionCommand, SessionEvent, SessionPipeline,
};
use medgrid::language::Language;
use medgrid::messages::{ImageAttachment, Message, Role};
use medgrid::session::{DataCategory, PatientInfo};
use medgrid::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Gateway that pops queued replies
struct ScriptedGateway {
    replies: Mutex<Vec<Result<String>>>,
}

impl ScriptedGateway {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
        })
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn converse(
        &self,
        _history: &[Message],
        _new_text: &str,
        _language: Language,
        _attachment: Option<&ImageAttachment>,
        _patient: Option<&PatientInfo>,
    ) -> Result<String> {
        self.replies
            .lock()
            .pop()
            .unwrap_or(Err(Error::Gateway("no scripted reply".into())))
    }
}

/// Synthesizer returning a fixed PCM payload
struct FixedSynthesizer {
    payload: Option<Vec<u8>>,
}

#[async_trait]
impl SpeechSynthesizer for FixedSynthesizer {
    async fn synthesize(&self, _text: &str) -> Option<Vec<u8>> {
        self.payload.clone()
    }
}

fn start_pipeline(
    replies: Vec<Result<String>>,
    payload: Option<Vec<u8>>,
) -> (
    crossbeam_channel::Sender<SessionCommand>,
    crossbeam_channel::Receiver<SessionEvent>,
) {
    let pipeline = SessionPipeline::new(
        AppConfig::default().with_api_key("test"),
        ScriptedGateway::new(replies),
        Arc::new(FixedSynthesizer { payload }),
        null_sink_factory(),
        Box::new(|| None),
    );
    let command_tx = pipeline.command_sender();
    let event_rx = pipeline.event_receiver();
    pipeline.start_worker().expect("worker failed to start");
    (command_tx, event_rx)
}

/// Receive events until one matches, skipping the rest
fn wait_for<T>(
    rx: &crossbeam_channel::Receiver<SessionEvent>,
    mut matcher: impl FnMut(SessionEvent) -> Option<T>,
) -> T {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .expect("timed out waiting for event");
        let event = rx
            .recv_timeout(remaining)
            .expect("event channel closed or timed out");
        if let Some(value) = matcher(event) {
            return value;
        }
    }
}

#[test]
fn test_worker_reports_ready_with_seeded_log() {
    let (command_tx, event_rx) = start_pipeline(vec![], None);

    let log = wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { log } => Some(log),
        _ => None,
    });

    let messages = log.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::Assistant);
    assert_eq!(messages[0].text, Language::En.greeting());

    command_tx.send(SessionCommand::Shutdown).unwrap();
    wait_for(&event_rx, |event| match event {
        SessionEvent::Shutdown => Some(()),
        _ => None,
    });
}

#[test]
fn test_submit_round_trip() {
    let (command_tx, event_rx) =
        start_pipeline(vec![Ok("Possible viral infection.".to_string())], None);

    let log = wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { log } => Some(log),
        _ => None,
    });

    command_tx
        .send(SessionCommand::Submit {
            text: "fever and cough".to_string(),
            attachment: None,
        })
        .unwrap();

    wait_for(&event_rx, |event| match event {
        SessionEvent::LoadingChanged(false) => Some(()),
        _ => None,
    });

    let messages = log.get_all();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].text, "fever and cough");
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].text, "Possible viral infection.");

    command_tx.send(SessionCommand::Shutdown).unwrap();
}

#[test]
fn test_gateway_failure_surfaces_as_fixed_text() {
    let (command_tx, event_rx) =
        start_pipeline(vec![Err(Error::Gateway("connection refused".into()))], None);

    let log = wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { log } => Some(log),
        _ => None,
    });

    command_tx
        .send(SessionCommand::Submit {
            text: "help".to_string(),
            attachment: None,
        })
        .unwrap();

    wait_for(&event_rx, |event| match event {
        SessionEvent::LoadingChanged(false) => Some(()),
        _ => None,
    });

    let messages = log.get_all();
    assert_eq!(messages[2].text, Language::En.gateway_error_text());

    command_tx.send(SessionCommand::Shutdown).unwrap();
}

#[test]
fn test_structured_data_and_document_request() {
    let (command_tx, event_rx) = start_pipeline(
        vec![
            Ok("Within range.".to_string()),
            Ok("# Prescription".to_string()),
        ],
        None,
    );

    let log = wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { log } => Some(log),
        _ => None,
    });

    command_tx
        .send(SessionCommand::SubmitData {
            category: DataCategory::Pulse,
            value: "80 BPM".to_string(),
        })
        .unwrap();
    wait_for(&event_rx, |event| match event {
        SessionEvent::LoadingChanged(false) => Some(()),
        _ => None,
    });

    command_tx.send(SessionCommand::RequestDocument).unwrap();
    wait_for(&event_rx, |event| match event {
        SessionEvent::LoadingChanged(false) => Some(()),
        _ => None,
    });

    let messages = log.get_all();
    assert_eq!(messages.len(), 5);
    assert!(messages[1].text.contains("Pulse Rate"));
    assert_eq!(messages[3].text, Language::En.document_request_label());
    assert_eq!(messages[4].text, "# Prescription");

    command_tx.send(SessionCommand::Shutdown).unwrap();
}

#[test]
fn test_capture_unavailable_without_recognizer() {
    let (command_tx, event_rx) = start_pipeline(vec![], None);

    wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { .. } => Some(()),
        _ => None,
    });

    command_tx.send(SessionCommand::ToggleCapture).unwrap();
    wait_for(&event_rx, |event| match event {
        SessionEvent::CaptureUnavailable => Some(()),
        _ => None,
    });

    command_tx.send(SessionCommand::Shutdown).unwrap();
}

#[test]
fn test_playback_with_silent_sink_completes() {
    // 100ms of silence, 16-bit mono
    let payload = vec![0u8; 4800];
    let (command_tx, event_rx) = start_pipeline(vec![], Some(payload));

    wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { .. } => Some(()),
        _ => None,
    });

    let id = Uuid::new_v4();
    command_tx
        .send(SessionCommand::Play {
            id,
            text: "read this aloud".to_string(),
        })
        .unwrap();

    let playing = wait_for(&event_rx, |event| match event {
        SessionEvent::PlaybackChanged(state) => Some(state),
        _ => None,
    });
    assert_eq!(playing, medgrid::audio::PlaybackState::Playing(id));

    // The silent sink completes immediately; the next poll reports idle
    let idle = wait_for(&event_rx, |event| match event {
        SessionEvent::PlaybackChanged(state) => Some(state),
        _ => None,
    });
    assert_eq!(idle, medgrid::audio::PlaybackState::Idle);

    command_tx.send(SessionCommand::Shutdown).unwrap();
}

#[test]
fn test_end_session_discards_log() {
    let (command_tx, event_rx) = start_pipeline(vec![Ok("noted".to_string())], None);

    let log = wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { log } => Some(log),
        _ => None,
    });

    command_tx
        .send(SessionCommand::SetPatient(PatientInfo {
            name: "Ada".to_string(),
            age: "34".to_string(),
            gender: "female".to_string(),
            phone: "555-0100".to_string(),
        }))
        .unwrap();
    let accepted = wait_for(&event_rx, |event| match event {
        SessionEvent::PatientAccepted(accepted) => Some(accepted),
        _ => None,
    });
    assert!(accepted);

    command_tx
        .send(SessionCommand::Submit {
            text: "hello".to_string(),
            attachment: None,
        })
        .unwrap();
    wait_for(&event_rx, |event| match event {
        SessionEvent::LoadingChanged(false) => Some(()),
        _ => None,
    });

    command_tx.send(SessionCommand::EndSession).unwrap();
    wait_for(&event_rx, |event| match event {
        SessionEvent::SessionEnded => Some(()),
        _ => None,
    });

    assert!(log.get_all().is_empty());

    command_tx.send(SessionCommand::Shutdown).unwrap();
}

#[test]
fn test_language_switch_replaces_greeting() {
    let (command_tx, event_rx) = start_pipeline(vec![], None);

    let log = wait_for(&event_rx, |event| match event {
        SessionEvent::Ready { log } => Some(log),
        _ => None,
    });

    command_tx
        .send(SessionCommand::SetLanguage(Language::Zh))
        .unwrap();
    command_tx.send(SessionCommand::Shutdown).unwrap();
    wait_for(&event_rx, |event| match event {
        SessionEvent::Shutdown => Some(()),
        _ => None,
    });

    let messages = log.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, Language::Zh.greeting());
}
