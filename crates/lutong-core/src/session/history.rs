//! Legacy flat message log.
//!
//! Predates chat sessions; kept only as a last-resort context source for
//! recipe generation when no session context exists.

use super::message::ChatMessage;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MessageLogRepository: Send + Sync {
    /// Appends (or replaces by id) one message.
    async fn append_message(&self, message: &ChatMessage) -> Result<()>;

    /// Returns every logged message, oldest first.
    async fn get_all_messages(&self) -> Result<Vec<ChatMessage>>;

    /// Removes every logged message.
    async fn clear_messages(&self) -> Result<()>;
}
