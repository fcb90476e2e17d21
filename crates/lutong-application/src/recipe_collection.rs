//! Read, search and delete over saved recipes.

use std::sync::Arc;

use lutong_core::error::Result;
use lutong_core::recipe::{Recipe, RecipeRepository};

pub struct RecipeCollection {
    recipes: Arc<dyn RecipeRepository>,
}

impl RecipeCollection {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    /// Recipes matching `query` (title, description or ingredient), newest first.
    /// `None` or a blank query returns everything.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Recipe>> {
        let recipes = self.recipes.get_recipes().await?;
        Ok(match query {
            Some(q) => recipes.into_iter().filter(|r| r.matches(q)).collect(),
            None => recipes,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Recipe>> {
        self.recipes.get_recipe(id).await
    }

    /// Deletes one recipe and returns the remaining list. Sessions are untouched.
    pub async fn remove(&self, id: &str) -> Result<Vec<Recipe>> {
        self.recipes.delete_recipe(id).await?;
        tracing::info!("[RecipeCollection] Removed recipe {}", id);
        self.list(None).await
    }
}
