//! AsyncDirStorage-based ProfileRepository implementation

use crate::dto::create_user_profile_migrator;
use crate::paths::LutongPaths;
use crate::storage_repository::{StorageRepository, missing_as_none};
use async_trait::async_trait;
use lutong_core::error::{LutongError, Result};
use lutong_core::user::{PROFILE_KEY, ProfileRepository, UserProfile};
use version_migrate::AsyncDirStorage;

/// Stores the single device profile under the fixed key `current-user`.
///
/// ```text
/// data_dir/
/// └── profile/
///     └── current-user.toml
/// ```
pub struct AsyncDirProfileRepository {
    storage: AsyncDirStorage,
}

impl StorageRepository for AsyncDirProfileRepository {
    const COLLECTION: &'static str = "profile";
    const ENTITY_NAME: &'static str = "user_profile";

    fn storage(&self) -> &AsyncDirStorage {
        &self.storage
    }
}

impl AsyncDirProfileRepository {
    pub async fn new(paths: &LutongPaths) -> Result<Self> {
        let storage = paths
            .create_async_dir_storage(Self::COLLECTION, create_user_profile_migrator())
            .await?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl ProfileRepository for AsyncDirProfileRepository {
    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        missing_as_none(
            self.storage
                .load::<UserProfile>(Self::ENTITY_NAME, PROFILE_KEY)
                .await,
        )
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        tracing::debug!("[ProfileRepository] Saving profile '{}'", profile.name);
        self.storage
            .save(Self::ENTITY_NAME, PROFILE_KEY, profile)
            .await
            .map_err(|e| LutongError::storage(format!("Failed to save profile: {}", e)))
    }
}
