//! Session domain module.
//!
//! This module contains all chat-session related domain models, repository
//! interfaces and the title heuristic.
//!
//! # Module Structure
//!
//! - `message`: Chat message types (`MessageRole`, `ChatMessage`)
//! - `model`: The persisted conversation (`ChatSession`)
//! - `title`: Human-readable title derivation from the first user message
//! - `repository`: Session persistence and the active-session pointer
//! - `history`: The legacy flat message log

mod history;
mod message;
mod model;
mod repository;
mod title;

pub use history::MessageLogRepository;
pub use message::{ChatMessage, MessageRole, WELCOME_MESSAGE_ID};
pub use model::{ChatSession, NEW_CHAT_TITLE};
pub use repository::SessionRepository;
pub use title::derive_title;
