//! The persistent store facade.
//!
//! `LutongStore` owns every collection under one data directory and implements
//! all repository traits by delegation. Collections are opened lazily by
//! [`LutongStore::init`], which is memoized: concurrent first callers converge on
//! one initialized instance, and later calls are free.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lutong_core::config::LutongConfig;
use lutong_core::error::{LutongError, Result};
use lutong_core::generation::{Acquisition, Completion, GenerationLedger, RegenerationState};
use lutong_core::recipe::{Recipe, RecipeRepository};
use lutong_core::session::{ChatMessage, ChatSession, MessageLogRepository, SessionRepository};
use lutong_core::user::{ProfileRepository, UserProfile};
use tokio::sync::OnceCell;

use crate::async_dir_message_log_repository::AsyncDirMessageLogRepository;
use crate::async_dir_profile_repository::AsyncDirProfileRepository;
use crate::async_dir_recipe_repository::AsyncDirRecipeRepository;
use crate::async_dir_session_repository::AsyncDirSessionRepository;
use crate::generation_ledger::FileGenerationLedger;
use crate::paths::LutongPaths;
use crate::schema::StoreManifest;
use crate::storage::AtomicTomlFile;

struct StoreCollections {
    schema_version: u32,
    profiles: AsyncDirProfileRepository,
    sessions: AsyncDirSessionRepository,
    recipes: AsyncDirRecipeRepository,
    messages: AsyncDirMessageLogRepository,
    ledger: FileGenerationLedger,
}

pub struct LutongStore {
    paths: LutongPaths,
    collections: OnceCell<StoreCollections>,
}

impl LutongStore {
    pub fn new(paths: LutongPaths) -> Self {
        Self {
            paths,
            collections: OnceCell::new(),
        }
    }

    pub fn from_config(config: &LutongConfig) -> Result<Self> {
        Ok(Self::new(LutongPaths::from_config(config)?))
    }

    /// Convenience for wiring services that take trait objects.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn paths(&self) -> &LutongPaths {
        &self.paths
    }

    /// Opens the store, upgrading the manifest if needed. Idempotent.
    pub async fn init(&self) -> Result<()> {
        self.collections().await.map(|_| ())
    }

    /// Schema version recorded in the manifest after `init`.
    pub async fn schema_version(&self) -> Result<u32> {
        Ok(self.collections().await?.schema_version)
    }

    async fn collections(&self) -> Result<&StoreCollections> {
        self.collections
            .get_or_try_init(|| Self::open(&self.paths))
            .await
    }

    async fn open(paths: &LutongPaths) -> Result<StoreCollections> {
        let manifest_file = AtomicTomlFile::<StoreManifest>::new(paths.manifest_file());
        let (schema_version, added) = tokio::task::spawn_blocking(move || {
            manifest_file.update(StoreManifest::default(), |manifest| {
                let added = manifest.upgrade()?;
                Ok((manifest.schema_version, added))
            })
        })
        .await
        .map_err(|e| LutongError::internal(format!("Store init task failed: {}", e)))??;

        if !added.is_empty() {
            tracing::info!(
                "[Store] Schema v{} at {}: created collections {:?}",
                schema_version,
                paths.data_dir().display(),
                added
            );
        }

        let ledger_dir = paths.generation_dir();
        tokio::fs::create_dir_all(&ledger_dir).await?;

        Ok(StoreCollections {
            schema_version,
            profiles: AsyncDirProfileRepository::new(paths).await?,
            sessions: AsyncDirSessionRepository::new(paths).await?,
            recipes: AsyncDirRecipeRepository::new(paths).await?,
            messages: AsyncDirMessageLogRepository::new(paths).await?,
            ledger: FileGenerationLedger::new(ledger_dir),
        })
    }
}

#[async_trait]
impl ProfileRepository for LutongStore {
    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        self.collections().await?.profiles.get_profile().await
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        self.collections().await?.profiles.put_profile(profile).await
    }
}

#[async_trait]
impl SessionRepository for LutongStore {
    async fn put_session(&self, session: &ChatSession) -> Result<()> {
        self.collections().await?.sessions.put_session(session).await
    }

    async fn get_sessions(&self) -> Result<Vec<ChatSession>> {
        self.collections().await?.sessions.get_sessions().await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        self.collections().await?.sessions.get_session(session_id).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.collections().await?.sessions.delete_session(session_id).await
    }

    async fn get_active_session_id(&self) -> Result<Option<String>> {
        self.collections().await?.sessions.get_active_session_id().await
    }

    async fn set_active_session_id(&self, session_id: &str) -> Result<()> {
        self.collections()
            .await?
            .sessions
            .set_active_session_id(session_id)
            .await
    }

    async fn clear_active_session_id(&self) -> Result<()> {
        self.collections().await?.sessions.clear_active_session_id().await
    }
}

#[async_trait]
impl RecipeRepository for LutongStore {
    async fn put_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.collections().await?.recipes.put_recipe(recipe).await
    }

    async fn get_recipes(&self) -> Result<Vec<Recipe>> {
        self.collections().await?.recipes.get_recipes().await
    }

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        self.collections().await?.recipes.get_recipe(id).await
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        self.collections().await?.recipes.delete_recipe(id).await
    }
}

#[async_trait]
impl MessageLogRepository for LutongStore {
    async fn append_message(&self, message: &ChatMessage) -> Result<()> {
        self.collections().await?.messages.append_message(message).await
    }

    async fn get_all_messages(&self) -> Result<Vec<ChatMessage>> {
        self.collections().await?.messages.get_all_messages().await
    }

    async fn clear_messages(&self) -> Result<()> {
        self.collections().await?.messages.clear_messages().await
    }
}

#[async_trait]
impl GenerationLedger for LutongStore {
    async fn acquire(&self, scope: &str, attempt: u32, stale_after: Duration) -> Result<Acquisition> {
        self.collections()
            .await?
            .ledger
            .acquire(scope, attempt, stale_after)
            .await
    }

    async fn complete(
        &self,
        scope: &str,
        token: &str,
        attempt: u32,
        recipe_id: &str,
    ) -> Result<Completion> {
        self.collections()
            .await?
            .ledger
            .complete(scope, token, attempt, recipe_id)
            .await
    }

    async fn release(&self, scope: &str, token: &str) -> Result<()> {
        self.collections().await?.ledger.release(scope, token).await
    }

    async fn state(&self, scope: &str) -> Result<RegenerationState> {
        self.collections().await?.ledger.state(scope).await
    }
}
