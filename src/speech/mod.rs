//! Speech capture for dictating into the message draft.
//!
//! Recognition is an optional platform capability. When no recognizer is
//! available the capture controller reports that instead of listening, and
//! the rest of the application keeps working over typed input.

mod capture;
mod recognizer;

pub use capture::{CaptureController, CaptureUpdate, ListeningState};
pub use recognizer::{platform_recognizer, CaptureEvent, SpeechRecognizer};
