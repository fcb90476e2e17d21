//! Recipe generation coordination.
//!
//! Turns a conversation into at most one recipe per explicit request, bounded
//! by [`MAX_REGENERATIONS`]. Duplicate requests (remounts, double clicks,
//! reloads) are resolved against the persisted generation ledger rather than
//! process-local flags, so the guarantee survives restarts.

use std::sync::Arc;
use std::time::Duration;

use lutong_core::config::LutongConfig;
use lutong_core::error::{LutongError, Result};
use lutong_core::generation::{
    Acquisition, Completion, GenerationLedger, ImageGenerator, MAX_REGENERATIONS, RecipeGenerator,
    RegenerationState, placeholder_image, scope_for,
};
use lutong_core::recipe::{Recipe, RecipeRepository};
use lutong_core::session::{ChatMessage, ChatSession, MessageLogRepository, SessionRepository};
use lutong_core::user::UserProfile;
use uuid::Uuid;

/// Entries taken from the legacy message log when it is the only context source.
const LEGACY_CONTEXT_LIMIT: usize = 10;

/// Result of a generation request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(Recipe),
    /// Dropped: the scope is already generating.
    AlreadyInProgress { attempt: u32 },
    /// Dropped: this attempt already completed.
    AlreadyGenerated {
        count: u32,
        latest_recipe_id: Option<String>,
    },
}

/// Repositories the coordinator reads and writes.
pub struct GenerationStores {
    pub sessions: Arc<dyn SessionRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub message_log: Arc<dyn MessageLogRepository>,
    pub ledger: Arc<dyn GenerationLedger>,
}

pub struct RecipeGenerationCoordinator {
    stores: GenerationStores,
    recipe_generator: Arc<dyn RecipeGenerator>,
    image_generator: Arc<dyn ImageGenerator>,
    stale_after: Duration,
}

impl RecipeGenerationCoordinator {
    pub fn new(
        stores: GenerationStores,
        recipe_generator: Arc<dyn RecipeGenerator>,
        image_generator: Arc<dyn ImageGenerator>,
        config: &LutongConfig,
    ) -> Self {
        Self {
            stores,
            recipe_generator,
            image_generator,
            stale_after: config.generation_stale_after(),
        }
    }

    /// Generates recipe number `attempt` (0 = initial) for the session's scope.
    ///
    /// # Errors
    ///
    /// - `RegenerationLimitExceeded` when `attempt > MAX_REGENERATIONS` (no side effects)
    /// - `InvalidInput` when `attempt` skips ahead of the next expected attempt
    /// - `GenerationFailed` when the recipe collaborator fails; the scope is released
    /// - storage errors from the store; a recipe saved before the ledger write
    ///   failed is removed again
    pub async fn generate(
        &self,
        session: Option<&ChatSession>,
        profile: &UserProfile,
        attempt: u32,
    ) -> Result<GenerationOutcome> {
        if attempt > MAX_REGENERATIONS {
            return Err(LutongError::RegenerationLimitExceeded {
                attempted: attempt,
                max: MAX_REGENERATIONS,
            });
        }

        let scope = scope_for(session.map(|s| s.id.as_str()));

        let token = match self
            .stores
            .ledger
            .acquire(&scope, attempt, self.stale_after)
            .await?
        {
            Acquisition::Granted { token } => token,
            Acquisition::AlreadyInProgress { attempt: running } => {
                tracing::info!(
                    "[RecipeGeneration] Dropping attempt {} for '{}': attempt {} in progress",
                    attempt,
                    scope,
                    running
                );
                return Ok(GenerationOutcome::AlreadyInProgress { attempt: running });
            }
            Acquisition::AlreadyGenerated {
                count,
                latest_recipe_id,
            } => {
                tracing::info!(
                    "[RecipeGeneration] Dropping duplicate attempt {} for '{}'",
                    attempt,
                    scope
                );
                return Ok(GenerationOutcome::AlreadyGenerated {
                    count,
                    latest_recipe_id,
                });
            }
            Acquisition::OutOfOrder { expected } => {
                return Err(LutongError::invalid_input(format!(
                    "regeneration attempt {} requested, next attempt is {}",
                    attempt, expected
                )));
            }
        };

        let recipe = match self.produce(session, profile, attempt).await {
            Ok(recipe) => recipe,
            Err(e) => {
                self.release(&scope, &token).await;
                return Err(e);
            }
        };

        match self
            .stores
            .ledger
            .complete(&scope, &token, attempt, &recipe.id)
            .await
        {
            Ok(Completion::Recorded(_)) => {
                tracing::info!(
                    "[RecipeGeneration] Generated '{}' ({}) for '{}', attempt {}",
                    recipe.title,
                    recipe.id,
                    scope,
                    attempt
                );
                Ok(GenerationOutcome::Generated(recipe))
            }
            Ok(Completion::Superseded(state)) => {
                tracing::warn!(
                    "[RecipeGeneration] Attempt {} for '{}' was taken over; discarding {}",
                    attempt,
                    scope,
                    recipe.id
                );
                self.discard(&recipe.id).await;
                Ok(match state.in_progress {
                    Some(in_flight) => GenerationOutcome::AlreadyInProgress {
                        attempt: in_flight.attempt,
                    },
                    None => GenerationOutcome::AlreadyGenerated {
                        count: state.count,
                        latest_recipe_id: state.latest_recipe_id().map(str::to_string),
                    },
                })
            }
            Err(e) => {
                self.discard(&recipe.id).await;
                self.release(&scope, &token).await;
                Err(e)
            }
        }
    }

    async fn release(&self, scope: &str, token: &str) {
        if let Err(e) = self.stores.ledger.release(scope, token).await {
            tracing::warn!("[RecipeGeneration] Failed to release '{}': {}", scope, e);
        }
    }

    /// Removes a saved recipe that the ledger did not record.
    async fn discard(&self, recipe_id: &str) {
        if let Err(e) = self.stores.recipes.delete_recipe(recipe_id).await {
            tracing::warn!(
                "[RecipeGeneration] Failed to remove unrecorded recipe {}: {}",
                recipe_id,
                e
            );
        }
    }

    async fn produce(
        &self,
        session: Option<&ChatSession>,
        profile: &UserProfile,
        attempt: u32,
    ) -> Result<Recipe> {
        let conversation = self.conversation_for(session).await?;

        let draft = self
            .recipe_generator
            .generate_recipe_draft(&conversation, profile, attempt)
            .await
            .map_err(|e| {
                if e.is_generation_failed() {
                    e
                } else {
                    LutongError::generation_failed(e)
                }
            })?;

        let image_url = match self
            .image_generator
            .generate_image(&draft.name, &draft.description)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    "[RecipeGeneration] Image generation failed for '{}', using placeholder: {}",
                    draft.name,
                    e
                );
                placeholder_image(&draft.name)
            }
        };

        let recipe = draft.into_recipe(
            format!("recipe-{}", Uuid::new_v4()),
            Some(image_url),
            lutong_core::time::now(),
        );
        self.stores.recipes.put_recipe(&recipe).await?;
        Ok(recipe)
    }

    /// Session messages, else the most recently updated persisted session,
    /// else the tail of the legacy message log.
    async fn conversation_for(&self, session: Option<&ChatSession>) -> Result<Vec<ChatMessage>> {
        if let Some(session) = session.filter(|s| !s.messages.is_empty()) {
            return Ok(session.messages.clone());
        }

        if let Some(recent) = self
            .stores
            .sessions
            .get_sessions()
            .await?
            .into_iter()
            .find(|s| !s.messages.is_empty())
        {
            tracing::debug!(
                "[RecipeGeneration] Using most recent session {} as context",
                recent.id
            );
            return Ok(recent.messages);
        }

        let log = self.stores.message_log.get_all_messages().await?;
        let start = log.len().saturating_sub(LEGACY_CONTEXT_LIMIT);
        tracing::debug!(
            "[RecipeGeneration] Using {} legacy log entries as context",
            log.len() - start
        );
        Ok(log[start..].to_vec())
    }

    pub async fn regeneration_state(&self, session_id: Option<&str>) -> Result<RegenerationState> {
        self.stores.ledger.state(&scope_for(session_id)).await
    }

    pub async fn remaining_regenerations(&self, session_id: Option<&str>) -> Result<u32> {
        Ok(self.regeneration_state(session_id).await?.remaining())
    }

    /// The latest recipe generated for the session, or without a session the
    /// most recent persisted recipe.
    pub async fn current_recipe(&self, session_id: Option<&str>) -> Result<Option<Recipe>> {
        match session_id {
            Some(id) => {
                let state = self.stores.ledger.state(&scope_for(Some(id))).await?;
                match state.latest_recipe_id() {
                    Some(recipe_id) => self.stores.recipes.get_recipe(recipe_id).await,
                    None => Ok(None),
                }
            }
            None => Ok(self.stores.recipes.get_recipes().await?.into_iter().next()),
        }
    }
}
