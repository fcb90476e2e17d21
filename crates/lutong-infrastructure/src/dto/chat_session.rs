//! ChatSession DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use lutong_core::session::{ChatMessage, ChatSession, MessageRole};

/// A message embedded in a persisted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl From<StoredMessage> for ChatMessage {
    fn from(dto: StoredMessage) -> Self {
        ChatMessage {
            id: dto.id,
            role: dto.role,
            content: dto.content,
            timestamp: dto.timestamp,
        }
    }
}

impl From<ChatMessage> for StoredMessage {
    fn from(message: ChatMessage) -> Self {
        StoredMessage {
            id: message.id,
            role: message.role,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

/// Chat session V1.0.0.
///
/// `messages` is an array of tables and must stay the last field for TOML output.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ChatSessionV1_0_0 {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

impl IntoDomain<ChatSession> for ChatSessionV1_0_0 {
    fn into_domain(self) -> ChatSession {
        ChatSession {
            id: self.id,
            title: self.title,
            messages: self.messages.into_iter().map(Into::into).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl FromDomain<ChatSession> for ChatSessionV1_0_0 {
    fn from_domain(session: ChatSession) -> Self {
        ChatSessionV1_0_0 {
            id: session.id,
            title: session.title,
            created_at: session.created_at,
            updated_at: session.updated_at,
            messages: session.messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Creates and configures a Migrator instance for ChatSession entities.
pub fn create_chat_session_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let session_path = version_migrate::Migrator::define("chat_session")
        .from::<ChatSessionV1_0_0>()
        .into_with_save::<ChatSession>();

    migrator
        .register(session_path)
        .expect("Failed to register chat_session migration path");

    migrator
}
