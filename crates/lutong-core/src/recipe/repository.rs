//! Recipe repository trait.

use super::model::Recipe;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence contract for generated recipes.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert-or-replace by id.
    async fn put_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// All recipes, most recently created first.
    async fn get_recipes(&self) -> Result<Vec<Recipe>>;

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>>;

    /// Deleting an unknown id is not an error.
    async fn delete_recipe(&self, id: &str) -> Result<()>;
}
