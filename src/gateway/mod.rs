//! Stateless client layer over the hosted chat-completion and
//! speech-synthesis endpoints.
//!
//! The two traits are the seams the session and playback controller are
//! tested through; [`client::GeminiClient`] implements both against the
//! Gemini REST API.

pub mod client;
pub mod prompts;

use crate::language::Language;
use crate::messages::{ImageAttachment, Message};
use crate::session::PatientInfo;
use crate::Result;
use async_trait::async_trait;

/// Chat-completion endpoint.
///
/// One attempt per call, no retry. The system instruction is rebuilt and
/// resent on every call; the backend holds no session state.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send the prior turn history plus a new user turn and return the
    /// assistant's text. Fails with [`crate::Error::Gateway`] when the call
    /// fails or the backend returns no usable text; the caller decides how
    /// to surface that.
    async fn converse(
        &self,
        history: &[Message],
        new_text: &str,
        language: Language,
        attachment: Option<&ImageAttachment>,
        patient: Option<&PatientInfo>,
    ) -> Result<String>;
}

/// Speech-synthesis endpoint.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the fixed voice profile. Returns the raw
    /// encoded audio payload, or `None` on any failure — synthesis failure
    /// is never fatal to the conversation.
    async fn synthesize(&self, text: &str) -> Option<Vec<u8>>;
}
