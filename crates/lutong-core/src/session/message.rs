//! Chat message types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of the synthetic greeting shown before a session exists.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// Represents the author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant (or substituted on failure).
    Assistant,
}

/// A single immutable message in a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id (`user-<uuid>`, `assistant-<uuid>`, `error-<uuid>` or `welcome`).
    pub id: String,
    /// The author of the message.
    pub role: MessageRole,
    /// The message text.
    pub content: String,
    /// Timestamp when the message was created (RFC 3339).
    pub timestamp: String,
}

impl ChatMessage {
    fn with_prefix(prefix: &str, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", prefix, Uuid::new_v4()),
            role,
            content: content.into(),
            timestamp: crate::time::now(),
        }
    }

    /// Creates a fresh user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_prefix("user", MessageRole::User, content)
    }

    /// Creates a fresh assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_prefix("assistant", MessageRole::Assistant, content)
    }

    /// Creates the assistant message substituted when reply generation fails.
    pub fn assistant_error(content: impl Into<String>) -> Self {
        Self::with_prefix("error", MessageRole::Assistant, content)
    }

    /// Creates the synthetic greeting shown on an empty chat.
    pub fn welcome(user_name: &str) -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            role: MessageRole::Assistant,
            content: format!(
                "Hi {}! I'm your Filipino recipe assistant. Tell me what ingredients you have, what you're craving, or any dietary preferences, and I'll help you discover the perfect Filipino dish to cook today!",
                user_name
            ),
            timestamp: crate::time::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
