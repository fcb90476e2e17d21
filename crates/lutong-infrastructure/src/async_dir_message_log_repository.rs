//! AsyncDirStorage-based legacy flat message log.

use crate::dto::create_chat_message_migrator;
use crate::paths::LutongPaths;
use crate::storage_repository::StorageRepository;
use async_trait::async_trait;
use lutong_core::error::{LutongError, Result};
use lutong_core::session::{ChatMessage, MessageLogRepository};
use version_migrate::AsyncDirStorage;

/// One file per message under `chat_messages/`.
pub struct AsyncDirMessageLogRepository {
    storage: AsyncDirStorage,
}

impl StorageRepository for AsyncDirMessageLogRepository {
    const COLLECTION: &'static str = "chat_messages";
    const ENTITY_NAME: &'static str = "chat_message";

    fn storage(&self) -> &AsyncDirStorage {
        &self.storage
    }
}

impl AsyncDirMessageLogRepository {
    pub async fn new(paths: &LutongPaths) -> Result<Self> {
        let storage = paths
            .create_async_dir_storage(Self::COLLECTION, create_chat_message_migrator())
            .await?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl MessageLogRepository for AsyncDirMessageLogRepository {
    async fn append_message(&self, message: &ChatMessage) -> Result<()> {
        self.storage
            .save(Self::ENTITY_NAME, &message.id, message)
            .await
            .map_err(|e| LutongError::storage(format!("Failed to append message: {}", e)))
    }

    async fn get_all_messages(&self) -> Result<Vec<ChatMessage>> {
        let all = self
            .storage
            .load_all::<ChatMessage>(Self::ENTITY_NAME)
            .await?;

        let mut messages: Vec<ChatMessage> = all.into_iter().map(|(_, m)| m).collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

        Ok(messages)
    }

    async fn clear_messages(&self) -> Result<()> {
        let all = self
            .storage
            .load_all::<ChatMessage>(Self::ENTITY_NAME)
            .await?;
        let count = all.len();
        for (id, _) in all {
            self.storage.delete(&id).await?;
        }
        tracing::info!("[MessageLog] Cleared {} legacy messages", count);
        Ok(())
    }
}
