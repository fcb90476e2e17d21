//! Wiring of the application services over one [`LutongStore`].

use std::sync::Arc;

use lutong_core::config::LutongConfig;
use lutong_core::error::Result;
use lutong_core::generation::{ImageGenerator, RecipeGenerator, ReplyGenerator};
use lutong_infrastructure::LutongStore;

use crate::profile_service::ProfileService;
use crate::recipe_collection::RecipeCollection;
use crate::recipe_generation::{GenerationStores, RecipeGenerationCoordinator};
use crate::session::SessionManager;
use crate::turn_controller::ConversationTurnController;

/// Store-backed services. Collaborator-driven services are built on demand.
pub struct LutongServices {
    pub config: LutongConfig,
    pub store: Arc<LutongStore>,
    pub profiles: ProfileService,
    pub sessions: Arc<SessionManager>,
    pub recipes: RecipeCollection,
}

impl LutongServices {
    /// Opens the store described by `config` and restores the active session.
    pub async fn open(config: LutongConfig) -> Result<Self> {
        let store = LutongStore::from_config(&config)?.shared();
        store.init().await?;

        let services = Self::with_store(config, store);
        services.sessions.restore().await?;
        Ok(services)
    }

    pub fn with_store(config: LutongConfig, store: Arc<LutongStore>) -> Self {
        Self {
            profiles: ProfileService::new(store.clone()),
            sessions: Arc::new(SessionManager::new(store.clone())),
            recipes: RecipeCollection::new(store.clone()),
            store,
            config,
        }
    }

    pub fn conversation(&self, replies: Arc<dyn ReplyGenerator>) -> ConversationTurnController {
        ConversationTurnController::new(self.sessions.clone(), replies, &self.config)
    }

    pub fn recipe_generation(
        &self,
        recipe_generator: Arc<dyn RecipeGenerator>,
        image_generator: Arc<dyn ImageGenerator>,
    ) -> RecipeGenerationCoordinator {
        RecipeGenerationCoordinator::new(
            GenerationStores {
                sessions: self.store.clone(),
                recipes: self.store.clone(),
                message_log: self.store.clone(),
                ledger: self.store.clone(),
            },
            recipe_generator,
            image_generator,
            &self.config,
        )
    }
}
