use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::MedicationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One transcript entry. Insertion order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Mutable per-session conversation state: the currently recognized
/// medication and an append-only message transcript. Created empty,
/// discarded with the session. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct ConversationContext {
    pub current_medication: Option<MedicationRecord>,
    history: Vec<ChatMessage>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: &str) {
        self.push(MessageRole::User, text);
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.push(MessageRole::Assistant, text);
    }

    fn push(&mut self, role: MessageRole, text: &str) {
        self.history.push(ChatMessage {
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// The transcript, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Clear the recognized medication. The transcript survives; a reset
    /// only drops the recognition state, not what was already said.
    pub fn reset(&mut self) {
        self.current_medication = None;
    }
}
