use lutong_core::error::{LutongError, Result};
use lutong_core::session::{ChatMessage, ChatSession, SessionRepository};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the single in-memory "current chat session".
///
/// `SessionManager` is responsible for:
/// - Creating a session lazily on the first committed turn
/// - Promoting the title once a user message exists
/// - Persisting after every turn
/// - Tracking the active session across restarts
pub struct SessionManager {
    repository: Arc<dyn SessionRepository>,
    current: RwLock<Option<ChatSession>>,
}

impl SessionManager {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            repository,
            current: RwLock::new(None),
        }
    }

    /// Snapshot of the current session, if any.
    pub async fn current(&self) -> Option<ChatSession> {
        self.current.read().await.clone()
    }

    /// Re-adopts the persisted active session on startup.
    ///
    /// A pointer to a session that no longer exists is cleared.
    pub async fn restore(&self) -> Result<Option<ChatSession>> {
        let Some(session_id) = self.repository.get_active_session_id().await? else {
            return Ok(None);
        };

        match self.repository.get_session(&session_id).await? {
            Some(session) => {
                tracing::info!("[SessionManager] Restored session {}", session.id);
                *self.current.write().await = Some(session.clone());
                Ok(Some(session))
            }
            None => {
                tracing::warn!(
                    "[SessionManager] Active session {} no longer exists",
                    session_id
                );
                self.repository.clear_active_session_id().await?;
                Ok(None)
            }
        }
    }

    /// Leaves the current session, returning to "no active session".
    ///
    /// A current session with more than one message is persisted first.
    pub async fn start_new(&self) -> Result<()> {
        let mut current = self.current.write().await;

        if let Some(session) = current.as_ref() {
            if session.messages.len() > 1 {
                tracing::debug!("[SessionManager] Flushing session {}", session.id);
                self.repository.put_session(session).await?;
            }
        }

        *current = None;
        self.repository.clear_active_session_id().await?;
        tracing::info!("[SessionManager] Started new chat");
        Ok(())
    }

    /// Loads a persisted session and makes it current without modifying it.
    pub async fn select(&self, session_id: &str) -> Result<ChatSession> {
        let session = self
            .repository
            .get_session(session_id)
            .await?
            .ok_or_else(|| LutongError::not_found("ChatSession", session_id))?;

        self.repository.set_active_session_id(&session.id).await?;
        *self.current.write().await = Some(session.clone());

        tracing::info!("[SessionManager] Selected session {}", session.id);
        Ok(session)
    }

    /// Commits the full message list of a completed turn.
    ///
    /// `base` is the id of the session the turn was built on (`None` for the
    /// welcome screen). If the current session changed since, nothing is
    /// written and a `Conflict` is returned.
    ///
    /// Creates the session on the first commit; otherwise replaces its messages.
    /// The in-memory session only changes once the write succeeded.
    pub async fn commit_turn(
        &self,
        base: Option<&str>,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatSession> {
        let mut current = self.current.write().await;

        let current_id = current.as_ref().map(|s| s.id.as_str());
        if current_id != base {
            tracing::warn!(
                "[SessionManager] Turn built on {:?} rejected: current session is {:?}",
                base,
                current_id
            );
            return Err(LutongError::conflict(
                "the active chat session changed while the turn was running",
            ));
        }

        let session = match current.as_ref() {
            Some(existing) => {
                let mut updated = existing.clone();
                updated.apply_turn(messages);
                updated
            }
            None => {
                let created = ChatSession::create(messages);
                tracing::info!(
                    "[SessionManager] Created session {} '{}'",
                    created.id,
                    created.title
                );
                created
            }
        };

        self.repository.put_session(&session).await?;
        *current = Some(session.clone());

        if let Err(e) = self.repository.set_active_session_id(&session.id).await {
            tracing::warn!(
                "[SessionManager] Session {} saved but active pointer not updated: {}",
                session.id,
                e
            );
        }

        Ok(session)
    }

    /// All persisted sessions, most recently updated first.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        self.repository.get_sessions().await
    }

    /// Deletes a session. Deleting the current session leaves no active session.
    pub async fn delete(&self, session_id: &str) -> Result<()> {
        self.repository.delete_session(session_id).await?;

        let mut current = self.current.write().await;
        let was_current = current.as_ref().is_some_and(|s| s.id == session_id);
        if was_current {
            *current = None;
        }

        let was_active =
            self.repository.get_active_session_id().await?.as_deref() == Some(session_id);
        if was_current || was_active {
            self.repository.clear_active_session_id().await?;
        }

        tracing::info!("[SessionManager] Deleted session {}", session_id);
        Ok(())
    }
}
