//! AsyncDirStorage-based RecipeRepository implementation

use crate::dto::create_recipe_migrator;
use crate::paths::LutongPaths;
use crate::storage_repository::{StorageRepository, missing_as_none, missing_as_ok};
use async_trait::async_trait;
use lutong_core::error::{LutongError, Result};
use lutong_core::recipe::{Recipe, RecipeRepository};
use version_migrate::AsyncDirStorage;

/// One file per recipe.
///
/// ```text
/// data_dir/
/// └── recipes/
///     └── recipe-<uuid>.toml
/// ```
pub struct AsyncDirRecipeRepository {
    storage: AsyncDirStorage,
}

impl StorageRepository for AsyncDirRecipeRepository {
    const COLLECTION: &'static str = "recipes";
    const ENTITY_NAME: &'static str = "recipe";

    fn storage(&self) -> &AsyncDirStorage {
        &self.storage
    }
}

impl AsyncDirRecipeRepository {
    pub async fn new(paths: &LutongPaths) -> Result<Self> {
        let storage = paths
            .create_async_dir_storage(Self::COLLECTION, create_recipe_migrator())
            .await?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl RecipeRepository for AsyncDirRecipeRepository {
    async fn put_recipe(&self, recipe: &Recipe) -> Result<()> {
        tracing::debug!("[RecipeRepository] Saving recipe {} '{}'", recipe.id, recipe.title);
        self.storage
            .save(Self::ENTITY_NAME, &recipe.id, recipe)
            .await
            .map_err(|e| LutongError::storage(format!("Failed to save recipe: {}", e)))
    }

    async fn get_recipes(&self) -> Result<Vec<Recipe>> {
        let all_recipes = self.storage.load_all::<Recipe>(Self::ENTITY_NAME).await?;

        let mut recipes: Vec<Recipe> = all_recipes.into_iter().map(|(_, r)| r).collect();

        // Sort by created_at descending (most recent first)
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(recipes)
    }

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        missing_as_none(self.storage.load::<Recipe>(Self::ENTITY_NAME, id).await)
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        tracing::debug!("[RecipeRepository] Deleting recipe {}", id);
        missing_as_ok(self.storage.delete(id).await)
    }
}
