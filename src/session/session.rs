//! Conversation session orchestration
//!
//! [`ConversationSession`] owns the conversation log and turn sequencing:
//! exactly one gateway call may be in flight, user messages are appended
//! optimistically before the call, and every gateway failure is converted
//! into a single fixed-text assistant message rather than an error the
//! caller has to handle. The session is confined to the pipeline worker
//! thread; nothing here needs a lock beyond the log's own.

use crate::gateway::ChatGateway;
use crate::language::Language;
use crate::messages::{ConversationLog, ImageAttachment, Message};
use crate::session::{DataCategory, PatientInfo};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ConversationSession {
    log: ConversationLog,
    gateway: Arc<dyn ChatGateway>,
    language: Language,
    patient: Option<PatientInfo>,
    loading: bool,
}

impl ConversationSession {
    /// Create a session with a log pre-seeded with the localized greeting
    pub fn new(gateway: Arc<dyn ChatGateway>, language: Language) -> Self {
        Self {
            log: ConversationLog::with_greeting(language.greeting()),
            gateway,
            language,
            patient: None,
            loading: false,
        }
    }

    pub fn log(&self) -> Vec<Message> {
        self.log.get_all()
    }

    /// Shared handle to the log. Clones observe appends live, which is what
    /// lets the interface render the optimistic user turn while the gateway
    /// call is still blocking the worker.
    pub fn log_handle(&self) -> ConversationLog {
        self.log.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn patient(&self) -> Option<&PatientInfo> {
        self.patient.as_ref()
    }

    /// Switch the interface language. The seeded greeting is replaced
    /// wholesale as long as no user interaction has occurred; afterwards the
    /// log stays untouched and only subsequent fixed strings change.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.log.replace_greeting(language.greeting());
    }

    /// Record the patient profile for system-instruction injection.
    /// Ignored once the conversation has user turns; the profile is
    /// immutable for the session's lifetime.
    pub fn set_patient(&mut self, patient: PatientInfo) -> bool {
        if self.log.has_user_turns() || self.patient.is_some() {
            return false;
        }
        self.patient = Some(patient);
        true
    }

    /// Submit free-text user input, optionally with a staged image.
    ///
    /// Returns `false` without touching the log or the gateway when both the
    /// trimmed text is empty and no attachment is given, or when a request
    /// is already in flight.
    pub async fn submit_message(
        &mut self,
        text: &str,
        attachment: Option<ImageAttachment>,
    ) -> bool {
        let text = text.trim();
        if text.is_empty() && attachment.is_none() {
            return false;
        }
        self.submit_turn(text.to_string(), text.to_string(), attachment)
            .await
    }

    /// Submit a structured data value under a header naming its category
    pub async fn submit_structured_data(&mut self, category: DataCategory, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let formatted = category.format_submission(self.language, value);
        self.submit_turn(formatted.clone(), formatted, None).await
    }

    /// Ask the backend for a formal diagnostic document. The log shows a
    /// cosmetic request label in place of the literal directive text.
    pub async fn request_formal_document(&mut self) -> bool {
        self.submit_turn(
            self.language.document_request_label().to_string(),
            self.language.document_request_directive().to_string(),
            None,
        )
        .await
    }

    async fn submit_turn(
        &mut self,
        display_text: String,
        wire_text: String,
        attachment: Option<ImageAttachment>,
    ) -> bool {
        if self.loading {
            debug!("Rejecting submit: a request is already in flight");
            return false;
        }

        // History snapshot before the optimistic append; the new turn is
        // sent separately from the prior log.
        let history = self.log.get_all();

        let mut user_message = Message::user(display_text);
        if let Some(image) = attachment.clone() {
            user_message = user_message.with_attachment(image);
        }
        self.log.add(user_message);
        self.loading = true;

        let result = self
            .gateway
            .converse(
                &history,
                &wire_text,
                self.language,
                attachment.as_ref(),
                self.patient.as_ref(),
            )
            .await;

        let reply = match result {
            Ok(text) => text,
            Err(e) => {
                warn!("Gateway call failed: {}", e);
                self.language.gateway_error_text().to_string()
            }
        };

        self.log.add(Message::assistant(reply));
        self.loading = false;
        true
    }

    /// Tear the session down: the log and patient profile are discarded.
    /// The pipeline pairs this with stopping playback and capture.
    pub fn end_session(&mut self) {
        self.log.clear();
        self.patient = None;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;
    use crate::{Error, Result};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Scripted gateway: pops queued replies and records every call
    struct ScriptedGateway {
        replies: Mutex<Vec<Result<String>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    struct RecordedCall {
        history_len: usize,
        new_text: String,
        has_attachment: bool,
        has_patient: bool,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                // Popped from the back, so store in reverse
                replies: Mutex::new(replies.into_iter().rev().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl ChatGateway for ScriptedGateway {
        async fn converse(
            &self,
            history: &[Message],
            new_text: &str,
            _language: Language,
            attachment: Option<&ImageAttachment>,
            patient: Option<&PatientInfo>,
        ) -> Result<String> {
            self.calls.lock().push(RecordedCall {
                history_len: history.len(),
                new_text: new_text.to_string(),
                has_attachment: attachment.is_some(),
                has_patient: patient.is_some(),
            });
            self.replies
                .lock()
                .pop()
                .unwrap_or(Err(Error::Gateway("no scripted reply".into())))
        }
    }

    fn session_with(replies: Vec<Result<String>>) -> (ConversationSession, Arc<ScriptedGateway>) {
        let gateway = ScriptedGateway::new(replies);
        let session = ConversationSession::new(gateway.clone(), Language::En);
        (session, gateway)
    }

    #[tokio::test]
    async fn test_successful_turn() {
        let (mut session, gateway) =
            session_with(vec![Ok("Possible viral infection.".to_string())]);

        assert!(session.submit_message("fever and cough", None).await);

        let log = session.log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].role, Role::Assistant); // greeting
        assert_eq!(log[1].text, "fever and cough");
        assert_eq!(log[1].role, Role::User);
        assert_eq!(log[2].text, "Possible viral infection.");
        assert_eq!(log[2].role, Role::Assistant);
        assert!(!session.is_loading());

        // The call carried the prior log only (the greeting), not the new turn
        let calls = gateway.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].history_len, 1);
        assert_eq!(calls[0].new_text, "fever and cough");
        assert!(!calls[0].has_attachment);
    }

    #[tokio::test]
    async fn test_empty_submit_is_noop() {
        let (mut session, gateway) = session_with(vec![Ok("unused".to_string())]);

        assert!(!session.submit_message("", None).await);
        assert!(!session.submit_message("   \n", None).await);

        assert_eq!(session.log().len(), 1); // only the greeting
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_attachment_alone_is_sendable() {
        let (mut session, gateway) = session_with(vec![Ok("Noted.".to_string())]);

        let image = ImageAttachment::from_bytes(b"pixels", "image/jpeg");
        assert!(session.submit_message("", Some(image)).await);

        let log = session.log();
        assert!(log[1].attachment.is_some());
        assert!(gateway.calls.lock()[0].has_attachment);
    }

    #[tokio::test]
    async fn test_gateway_error_appends_fixed_message() {
        let (mut session, _gateway) =
            session_with(vec![Err(Error::Gateway("connection refused".into()))]);

        assert!(session.submit_message("help", None).await);

        let log = session.log();
        assert_eq!(log.len(), 3);
        // The triggering user message is kept, not rolled back
        assert_eq!(log[1].text, "help");
        assert_eq!(log[2].text, Language::En.gateway_error_text());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_alternation_over_multiple_turns() {
        let (mut session, _gateway) = session_with(vec![
            Ok("reply one".to_string()),
            Ok("reply two".to_string()),
            Err(Error::Gateway("down".into())),
        ]);

        session.submit_message("first", None).await;
        session.submit_message("second", None).await;
        session.submit_message("third", None).await;

        let log = session.log();
        assert_eq!(log.len(), 7);
        for pair in log[1..].chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
        assert_eq!(log[2].text, "reply one");
        assert_eq!(log[4].text, "reply two");
        assert_eq!(log[6].text, Language::En.gateway_error_text());
    }

    #[tokio::test]
    async fn test_structured_data_submission() {
        let (mut session, gateway) = session_with(vec![Ok("Within normal range.".to_string())]);

        assert!(
            session
                .submit_structured_data(DataCategory::Pulse, "80 BPM")
                .await
        );

        let log = session.log();
        assert!(log[1].text.contains("Pulse Rate"));
        assert!(log[1].text.contains("80 BPM"));
        // Display text and wire text match for structured data
        assert_eq!(gateway.calls.lock()[0].new_text, log[1].text);
    }

    #[tokio::test]
    async fn test_empty_structured_value_is_noop() {
        let (mut session, gateway) = session_with(vec![Ok("unused".to_string())]);
        assert!(
            !session
                .submit_structured_data(DataCategory::Blood, "  ")
                .await
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_formal_document_shows_label_sends_directive() {
        let (mut session, gateway) = session_with(vec![Ok("# Medical Prescription".to_string())]);

        assert!(session.request_formal_document().await);

        let log = session.log();
        assert_eq!(log[1].text, Language::En.document_request_label());

        let calls = gateway.calls.lock();
        assert_eq!(calls[0].new_text, Language::En.document_request_directive());
        assert_ne!(calls[0].new_text, log[1].text);
    }

    #[tokio::test]
    async fn test_patient_profile_threaded_into_calls() {
        let (mut session, gateway) = session_with(vec![Ok("ok".to_string())]);

        let accepted = session.set_patient(PatientInfo {
            name: "Ada".to_string(),
            age: "34".to_string(),
            gender: "female".to_string(),
            phone: "555-0100".to_string(),
        });
        assert!(accepted);

        session.submit_message("hello", None).await;
        assert!(gateway.calls.lock()[0].has_patient);

        // Immutable once set, and rejected after user turns
        assert!(!session.set_patient(PatientInfo {
            name: "Bob".to_string(),
            age: "40".to_string(),
            gender: "male".to_string(),
            phone: "555-0101".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_language_switch_replaces_greeting_before_interaction() {
        let (mut session, _gateway) = session_with(vec![Ok("好的".to_string())]);

        session.set_language(Language::Zh);
        let log = session.log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].text, Language::Zh.greeting());

        session.submit_message("你好", None).await;
        session.set_language(Language::En);
        // After a user turn the log stays untouched
        assert_eq!(session.log()[0].text, Language::Zh.greeting());
        assert_eq!(session.language(), Language::En);
    }

    #[tokio::test]
    async fn test_submit_rejected_while_in_flight() {
        let (mut session, gateway) = session_with(vec![Ok("ok".to_string())]);

        // Simulate an outstanding request
        session.loading = true;
        assert!(!session.submit_message("hello", None).await);
        assert_eq!(session.log().len(), 1);
        assert_eq!(gateway.call_count(), 0);

        session.loading = false;
        assert!(session.submit_message("hello", None).await);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_end_session_discards_everything() {
        let (mut session, _gateway) = session_with(vec![Ok("ok".to_string())]);

        session.set_patient(PatientInfo {
            name: "Ada".to_string(),
            age: "34".to_string(),
            gender: "female".to_string(),
            phone: "555-0100".to_string(),
        });
        session.submit_message("hello", None).await;

        session.end_session();
        assert!(session.log().is_empty());
        assert!(session.patient().is_none());
        assert!(!session.is_loading());
    }
}
