//! Legacy flat chat-log DTOs.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use lutong_core::session::{ChatMessage, MessageRole};

/// One entry of the legacy flat message log.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ChatMessageV1_0_0 {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl IntoDomain<ChatMessage> for ChatMessageV1_0_0 {
    fn into_domain(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            role: self.role,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

impl FromDomain<ChatMessage> for ChatMessageV1_0_0 {
    fn from_domain(message: ChatMessage) -> Self {
        ChatMessageV1_0_0 {
            id: message.id,
            role: message.role,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

/// Creates and configures a Migrator instance for legacy chat-log entries.
pub fn create_chat_message_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let message_path = version_migrate::Migrator::define("chat_message")
        .from::<ChatMessageV1_0_0>()
        .into_with_save::<ChatMessage>();

    migrator
        .register(message_path)
        .expect("Failed to register chat_message migration path");

    migrator
}
