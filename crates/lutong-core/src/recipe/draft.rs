//! Structured recipe output produced by the recipe collaborator.

use serde::{Deserialize, Serialize};

use super::model::{Difficulty, Recipe};
use crate::error::{LutongError, Result};

/// Serving size as returned by the collaborator: either a head count or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Servings {
    Count(u32),
    Text(String),
}

impl Servings {
    /// Renders the value stored on a [`Recipe`].
    pub fn render(&self) -> String {
        match self {
            Servings::Count(n) => format!("{} servings", n),
            Servings::Text(text) => text.clone(),
        }
    }
}

impl Default for Servings {
    fn default() -> Self {
        Servings::Text(String::new())
    }
}

/// A recipe as proposed by the collaborator, before it gets an id and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cooking_time: String,
    /// Free text; normalized to [`Difficulty`] on assembly
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub servings: Servings,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DraftEnvelope {
    Wrapped { recipe: RecipeDraft },
    Bare(RecipeDraft),
}

impl RecipeDraft {
    /// Parses raw model output into a draft.
    ///
    /// Markdown code fences are stripped. Both `{"recipe": {...}, "regenerationCount": n}`
    /// and a bare recipe object are accepted. Anything else is a `GenerationFailed` error;
    /// there is no silent fallback recipe.
    pub fn from_model_output(text: &str) -> Result<Self> {
        let cleaned = strip_code_fences(text);
        let envelope: DraftEnvelope = serde_json::from_str(&cleaned).map_err(|e| {
            LutongError::generation_failed(format!("unparseable recipe output: {}", e))
        })?;
        let draft = match envelope {
            DraftEnvelope::Wrapped { recipe } => recipe,
            DraftEnvelope::Bare(recipe) => recipe,
        };
        if draft.name.trim().is_empty() {
            return Err(LutongError::generation_failed("recipe output has no name"));
        }
        Ok(draft)
    }

    /// Assembles the persisted recipe. Empty `tips`/`category` are dropped.
    pub fn into_recipe(
        self,
        id: String,
        image_url: Option<String>,
        created_at: String,
    ) -> Recipe {
        let tips = self.tips.filter(|tips| !tips.is_empty());
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Recipe {
            id,
            title: self.name,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            cooking_time: self.cooking_time,
            servings: self.servings.render(),
            difficulty: Difficulty::parse_lenient(&self.difficulty),
            image_url,
            created_at,
            tips,
            category,
        }
    }
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
