//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::ChatSession;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing chat session persistence.
///
/// Implementations must make each `put_session` atomic per record and must
/// not cache reads across their own writes.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts or replaces a session by id.
    async fn put_session(&self, session: &ChatSession) -> Result<()>;

    /// Lists all stored sessions, most recently updated first.
    async fn get_sessions(&self) -> Result<Vec<ChatSession>>;

    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ChatSession))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>>;

    /// Deletes a session. Deleting a missing session is not an error.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Gets the ID of the last active session, if one was recorded.
    async fn get_active_session_id(&self) -> Result<Option<String>>;

    /// Records the ID of the active session.
    async fn set_active_session_id(&self, session_id: &str) -> Result<()>;

    /// Forgets the active session.
    async fn clear_active_session_id(&self) -> Result<()>;
}
