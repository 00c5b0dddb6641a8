use super::types::{Message, Role};
use parking_lot::RwLock;
use std::sync::Arc;

/// The ordered, append-only conversation log.
///
/// Insertion order defines both display order and the turn history sent to
/// the backend. The only permitted mutation besides appending is replacing
/// the seeded greeting before any user turn exists, so it can be localized.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a log pre-seeded with an assistant greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let log = Self::new();
        log.add(Message::assistant(greeting));
        log
    }

    pub fn add(&self, message: Message) {
        self.messages.write().push(message);
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    /// Whether the user has interacted yet
    pub fn has_user_turns(&self) -> bool {
        self.messages.read().iter().any(|m| m.role == Role::User)
    }

    /// Replace the greeting wholesale. Only allowed before any user turn;
    /// returns false and leaves the log untouched otherwise.
    pub fn replace_greeting(&self, greeting: impl Into<String>) -> bool {
        let mut messages = self.messages.write();
        if messages.iter().any(|m| m.role == Role::User) {
            return false;
        }
        messages.clear();
        messages.push(Message::assistant(greeting));
        true
    }

    pub fn clear(&self) {
        self.messages.write().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}
