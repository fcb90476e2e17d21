//! Recipe domain module.
//!
//! - `model`: the persisted, immutable `Recipe`
//! - `draft`: the structured output of the recipe collaborator
//! - `repository`: persistence contract
//! - `checklist`: in-memory cooking progress over a recipe

mod checklist;
mod draft;
mod model;
mod repository;

pub use checklist::CookingChecklist;
pub use draft::{RecipeDraft, Servings};
pub use model::{Difficulty, Recipe};
pub use repository::RecipeRepository;
