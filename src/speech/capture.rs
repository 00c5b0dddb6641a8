//! Capture controller driving a single-utterance recognizer.

use crossbeam_channel::{Receiver, TryRecvError};
use tracing::{debug, warn};

use crate::language::Language;
use crate::speech::recognizer::{CaptureEvent, SpeechRecognizer};
use crate::{Error, Result};

/// Whether the capture controller is currently listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningState {
    Idle,
    Listening,
}

/// State change surfaced by [`CaptureController::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureUpdate {
    /// The accumulated transcript changed. Carries the full transcript so far.
    Transcript(String),
    /// The engine ended the utterance or failed; the controller is idle again.
    Stopped,
}

/// Owns the optional platform recognizer and tracks the listening toggle.
///
/// Capture is single-utterance: one toggle starts one listening session, and
/// the engine ending the utterance (or erroring) returns the controller to
/// idle on its own. Transcript pieces are joined with the language's
/// word-boundary convention.
pub struct CaptureController {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    state: ListeningState,
    events: Option<Receiver<CaptureEvent>>,
    transcript: String,
    language: Language,
}

impl CaptureController {
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>) -> Self {
        Self {
            recognizer,
            state: ListeningState::Idle,
            events: None,
            transcript: String::new(),
            language: Language::default(),
        }
    }

    /// Whether a recognition engine exists at all on this platform.
    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> ListeningState {
        self.state
    }

    /// Starts listening when idle, stops when listening.
    ///
    /// Returns the new state. Fails with a capability error when no
    /// recognition engine exists on this platform.
    pub fn toggle(&mut self, language: Language) -> Result<ListeningState> {
        match self.state {
            ListeningState::Idle => {
                let recognizer = self
                    .recognizer
                    .as_mut()
                    .ok_or(Error::CapabilityUnavailable)?;
                debug!(tag = language.recognition_tag(), "starting speech capture");
                let events = recognizer.start(language)?;
                self.events = Some(events);
                self.transcript.clear();
                self.language = language;
                self.state = ListeningState::Listening;
            }
            ListeningState::Listening => {
                self.stop();
            }
        }
        Ok(self.state)
    }

    /// Stops the engine and returns to idle. Safe to call when already idle.
    pub fn stop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        self.events = None;
        self.state = ListeningState::Idle;
    }

    /// Drains pending recognizer events and returns the resulting updates.
    ///
    /// Call once per worker iteration. `End` and `Error` both terminate the
    /// utterance; the transcript gathered up to that point stays valid.
    pub fn poll(&mut self) -> Vec<CaptureUpdate> {
        let mut updates = Vec::new();
        let Some(events) = self.events.as_ref() else {
            return updates;
        };

        let mut ended = false;
        loop {
            match events.try_recv() {
                Ok(CaptureEvent::Transcript(piece)) => {
                    self.transcript = self.language.join_transcript(&self.transcript, &piece);
                    updates.push(CaptureUpdate::Transcript(self.transcript.clone()));
                }
                Ok(CaptureEvent::End) => {
                    ended = true;
                    break;
                }
                Ok(CaptureEvent::Error(reason)) => {
                    warn!(reason, "speech recognition failed");
                    ended = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
                // Dropped sender means the engine thread is gone.
                Err(TryRecvError::Disconnected) => {
                    ended = true;
                    break;
                }
            }
        }

        if ended {
            self.stop();
            updates.push(CaptureUpdate::Stopped);
        }

        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Sender};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeRecognizer {
        sender: Arc<parking_lot::Mutex<Option<Sender<CaptureEvent>>>>,
        stops: Arc<AtomicUsize>,
    }

    impl FakeRecognizer {
        fn shared() -> (
            Box<Self>,
            Arc<parking_lot::Mutex<Option<Sender<CaptureEvent>>>>,
            Arc<AtomicUsize>,
        ) {
            let sender = Arc::new(parking_lot::Mutex::new(None));
            let stops = Arc::new(AtomicUsize::new(0));
            let rec = Box::new(Self {
                sender: sender.clone(),
                stops: stops.clone(),
            });
            (rec, sender, stops)
        }
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(&mut self, _language: Language) -> Result<Receiver<CaptureEvent>> {
            let (tx, rx) = unbounded();
            *self.sender.lock() = Some(tx);
            Ok(rx)
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            *self.sender.lock() = None;
        }
    }

    #[test]
    fn test_toggle_without_engine_reports_unavailable() {
        let mut controller = CaptureController::new(None);
        assert!(!controller.is_available());
        let err = controller.toggle(Language::En).unwrap_err();
        assert!(matches!(err, Error::CapabilityUnavailable));
        assert_eq!(controller.state(), ListeningState::Idle);
    }

    #[test]
    fn test_toggle_starts_and_stops() {
        let (rec, _sender, stops) = FakeRecognizer::shared();
        let mut controller = CaptureController::new(Some(rec));

        assert_eq!(controller.toggle(Language::En).unwrap(), ListeningState::Listening);
        assert_eq!(controller.toggle(Language::En).unwrap(), ListeningState::Idle);
        assert!(stops.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_transcript_pieces_joined_with_spacing() {
        let (rec, sender, _) = FakeRecognizer::shared();
        let mut controller = CaptureController::new(Some(rec));
        controller.toggle(Language::En).unwrap();

        let tx = sender.lock().clone().unwrap();
        tx.send(CaptureEvent::Transcript("fever".into())).unwrap();
        tx.send(CaptureEvent::Transcript("and chills".into())).unwrap();

        let updates = controller.poll();
        assert_eq!(
            updates,
            vec![
                CaptureUpdate::Transcript("fever".into()),
                CaptureUpdate::Transcript("fever and chills".into()),
            ]
        );
    }

    #[test]
    fn test_transcript_pieces_concatenated_for_chinese() {
        let (rec, sender, _) = FakeRecognizer::shared();
        let mut controller = CaptureController::new(Some(rec));
        controller.toggle(Language::Zh).unwrap();

        let tx = sender.lock().clone().unwrap();
        tx.send(CaptureEvent::Transcript("发烧".into())).unwrap();
        tx.send(CaptureEvent::Transcript("咳嗽".into())).unwrap();

        let updates = controller.poll();
        assert_eq!(
            updates.last(),
            Some(&CaptureUpdate::Transcript("发烧咳嗽".into()))
        );
    }

    #[test]
    fn test_engine_end_returns_to_idle() {
        let (rec, sender, _) = FakeRecognizer::shared();
        let mut controller = CaptureController::new(Some(rec));
        controller.toggle(Language::En).unwrap();

        let tx = sender.lock().clone().unwrap();
        tx.send(CaptureEvent::Transcript("done".into())).unwrap();
        tx.send(CaptureEvent::End).unwrap();

        let updates = controller.poll();
        assert_eq!(controller.state(), ListeningState::Idle);
        assert_eq!(updates.last(), Some(&CaptureUpdate::Stopped));
    }

    #[test]
    fn test_engine_error_returns_to_idle() {
        let (rec, sender, _) = FakeRecognizer::shared();
        let mut controller = CaptureController::new(Some(rec));
        controller.toggle(Language::En).unwrap();

        let tx = sender.lock().clone().unwrap();
        tx.send(CaptureEvent::Error("no-speech".into())).unwrap();

        let updates = controller.poll();
        assert_eq!(controller.state(), ListeningState::Idle);
        assert_eq!(updates, vec![CaptureUpdate::Stopped]);
    }

    #[test]
    fn test_poll_when_idle_is_empty() {
        let mut controller = CaptureController::new(None);
        assert!(controller.poll().is_empty());
    }

    #[test]
    fn test_new_toggle_clears_previous_transcript() {
        let (rec, sender, _) = FakeRecognizer::shared();
        let mut controller = CaptureController::new(Some(rec));

        controller.toggle(Language::En).unwrap();
        let tx = sender.lock().clone().unwrap();
        tx.send(CaptureEvent::Transcript("first".into())).unwrap();
        tx.send(CaptureEvent::End).unwrap();
        controller.poll();

        controller.toggle(Language::En).unwrap();
        let tx = sender.lock().clone().unwrap();
        tx.send(CaptureEvent::Transcript("second".into())).unwrap();
        let updates = controller.poll();
        assert_eq!(updates, vec![CaptureUpdate::Transcript("second".into())]);
    }
}
