//! Recipe DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use lutong_core::recipe::{Difficulty, Recipe};

/// Recipe V1.0.0 (free-text difficulty, no tips or category).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct RecipeV1_0_0 {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cooking_time: String,
    pub servings: String,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// Recipe V1.1.0 (added `tips` and `category`; difficulty restricted to Easy/Medium/Hard).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct RecipeV1_1_0 {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cooking_time: String,
    pub servings: String,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

// ============================================================================
// Migration implementations
// ============================================================================

impl MigratesTo<RecipeV1_1_0> for RecipeV1_0_0 {
    fn migrate(self) -> RecipeV1_1_0 {
        RecipeV1_1_0 {
            id: self.id,
            title: self.title,
            description: self.description,
            cooking_time: self.cooking_time,
            servings: self.servings,
            difficulty: Difficulty::parse_lenient(&self.difficulty).to_string(),
            image_url: self.image_url,
            created_at: self.created_at,
            category: None,
            ingredients: self.ingredients,
            instructions: self.instructions,
            tips: None,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<Recipe> for RecipeV1_1_0 {
    fn into_domain(self) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            cooking_time: self.cooking_time,
            servings: self.servings,
            difficulty: Difficulty::parse_lenient(&self.difficulty),
            image_url: self.image_url,
            created_at: self.created_at,
            tips: self.tips,
            category: self.category,
        }
    }
}

impl FromDomain<Recipe> for RecipeV1_1_0 {
    fn from_domain(recipe: Recipe) -> Self {
        RecipeV1_1_0 {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            cooking_time: recipe.cooking_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty.to_string(),
            image_url: recipe.image_url,
            created_at: recipe.created_at,
            category: recipe.category,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            tips: recipe.tips,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for Recipe entities.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: normalizes difficulty, adds empty `tips`/`category`
/// - V1.1.0 → Recipe
pub fn create_recipe_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let recipe_path = version_migrate::Migrator::define("recipe")
        .from::<RecipeV1_0_0>()
        .step::<RecipeV1_1_0>()
        .into_with_save::<Recipe>();

    migrator
        .register(recipe_path)
        .expect("Failed to register recipe migration path");

    migrator
}
