//! ChatSession domain model.

use super::message::ChatMessage;
use super::title::derive_title;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title carried by a session until one can be derived from a user message.
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// One continuous conversation.
///
/// A session is only materialized in the store on its first committed turn,
/// so a persisted session always has at least one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique session identifier (`session-<uuid>`)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Messages in insertion order
    pub messages: Vec<ChatMessage>,
    /// Timestamp when the session was created (RFC 3339)
    pub created_at: String,
    /// Timestamp when the session was last updated (RFC 3339)
    pub updated_at: String,
}

impl ChatSession {
    /// Creates a session from the messages of its first turn.
    pub fn create(messages: Vec<ChatMessage>) -> Self {
        let now = crate::time::now();
        let title = Self::title_for(&messages).unwrap_or_else(|| NEW_CHAT_TITLE.to_string());
        Self {
            id: format!("session-{}", Uuid::new_v4()),
            title,
            messages,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Replaces the messages and promotes the sentinel title once a user
    /// message exists.
    pub fn apply_turn(&mut self, messages: Vec<ChatMessage>) {
        if self.title == NEW_CHAT_TITLE {
            if let Some(title) = Self::title_for(&messages) {
                self.title = title;
            }
        }
        self.messages = messages;
        self.updated_at = crate::time::now();
    }

    pub fn first_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.is_user())
    }

    pub fn has_user_messages(&self) -> bool {
        self.first_user_message().is_some()
    }

    fn title_for(messages: &[ChatMessage]) -> Option<String> {
        messages
            .iter()
            .find(|m| m.is_user())
            .map(|m| derive_title(&m.content))
    }
}
