//! Recipe domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How demanding a recipe is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parses free text, falling back to `Medium` for anything unrecognized.
    pub fn parse_lenient(text: &str) -> Self {
        text.trim().parse().unwrap_or_default()
    }
}

/// A generated recipe.
///
/// Recipes are immutable once saved: a regeneration produces a new record
/// with a new id. Optional fields are absent rather than empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique recipe identifier (`recipe-<uuid>`)
    pub id: String,
    pub title: String,
    pub description: String,
    /// Ingredients in display order
    pub ingredients: Vec<String>,
    /// Instructions in cooking order
    pub instructions: Vec<String>,
    pub cooking_time: String,
    pub servings: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Timestamp when the recipe was created (RFC 3339)
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Recipe {
    /// Case-insensitive substring match against title, description or any
    /// ingredient. A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(&query))
    }
}
