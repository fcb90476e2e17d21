//! AsyncDirStorage-based SessionRepository implementation

use crate::dto::create_chat_session_migrator;
use crate::paths::LutongPaths;
use crate::storage_repository::{StorageRepository, missing_as_none, missing_as_ok};
use async_trait::async_trait;
use lutong_core::error::{LutongError, Result};
use lutong_core::session::{ChatSession, SessionRepository};
use std::path::PathBuf;
use tokio::fs;
use version_migrate::AsyncDirStorage;

/// AsyncDirStorage-based session repository.
///
/// Directory structure:
/// ```text
/// data_dir/
/// ├── chat_sessions/
/// │   ├── session-<uuid>.toml
/// │   └── session-<uuid>.toml
/// └── active_session.txt
/// ```
pub struct AsyncDirSessionRepository {
    storage: AsyncDirStorage,
    active_file: PathBuf,
}

impl StorageRepository for AsyncDirSessionRepository {
    const COLLECTION: &'static str = "chat_sessions";
    const ENTITY_NAME: &'static str = "chat_session";

    fn storage(&self) -> &AsyncDirStorage {
        &self.storage
    }
}

impl AsyncDirSessionRepository {
    pub async fn new(paths: &LutongPaths) -> Result<Self> {
        let storage = paths
            .create_async_dir_storage(Self::COLLECTION, create_chat_session_migrator())
            .await?;
        Ok(Self {
            storage,
            active_file: paths.active_session_file(),
        })
    }
}

#[async_trait]
impl SessionRepository for AsyncDirSessionRepository {
    async fn put_session(&self, session: &ChatSession) -> Result<()> {
        tracing::debug!(
            "[SessionRepository] Saving session {} ({} messages)",
            session.id,
            session.messages.len()
        );
        self.storage
            .save(Self::ENTITY_NAME, &session.id, session)
            .await
            .map_err(|e| LutongError::storage(format!("Failed to save session: {}", e)))
    }

    async fn get_sessions(&self) -> Result<Vec<ChatSession>> {
        let all_sessions = self
            .storage
            .load_all::<ChatSession>(Self::ENTITY_NAME)
            .await?;

        let mut sessions: Vec<ChatSession> =
            all_sessions.into_iter().map(|(_, session)| session).collect();

        // Most recently updated first
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(sessions)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        missing_as_none(
            self.storage
                .load::<ChatSession>(Self::ENTITY_NAME, session_id)
                .await,
        )
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        tracing::debug!("[SessionRepository] Deleting session {}", session_id);
        missing_as_ok(self.storage.delete(session_id).await)
    }

    async fn get_active_session_id(&self) -> Result<Option<String>> {
        if !fs::try_exists(&self.active_file).await? {
            return Ok(None);
        }

        let session_id = fs::read_to_string(&self.active_file).await?;
        let session_id = session_id.trim();
        if session_id.is_empty() {
            Ok(None)
        } else {
            Ok(Some(session_id.to_string()))
        }
    }

    async fn set_active_session_id(&self, session_id: &str) -> Result<()> {
        if let Some(parent) = self.active_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.active_file, session_id).await?;
        Ok(())
    }

    async fn clear_active_session_id(&self) -> Result<()> {
        match fs::remove_file(&self.active_file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
