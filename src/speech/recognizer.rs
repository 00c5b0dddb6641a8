//! Speech recognizer abstraction.

use crossbeam_channel::Receiver;

use crate::language::Language;
use crate::Result;

/// Event emitted by a running recognizer.
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// A finalized piece of transcript text.
    Transcript(String),
    /// The engine ended the utterance on its own (silence, timeout).
    End,
    /// The engine failed. Carries a short description for the log.
    Error(String),
}

/// A single-utterance speech recognition engine.
///
/// `start` begins listening and returns a channel of capture events. The
/// engine runs until it emits `End` or `Error`, or until `stop` is called.
/// Implementations own their engine thread; the returned receiver is the
/// only way results flow out.
pub trait SpeechRecognizer {
    fn start(&mut self, language: Language) -> Result<Receiver<CaptureEvent>>;
    fn stop(&mut self);
}

/// Returns the platform speech recognizer, if one exists.
///
/// Desktop builds have no bundled recognition engine, so this returns
/// `None` and dictation surfaces as an unavailable capability. A platform
/// port plugs its engine in here.
pub fn platform_recognizer() -> Option<Box<dyn SpeechRecognizer>> {
    None
}
