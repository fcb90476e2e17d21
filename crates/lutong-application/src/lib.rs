//! Application layer for Lutong.
//!
//! Coordinates the core domain and the persistent store: session lifecycle,
//! chat turns, bounded recipe generation, the recipe collection and onboarding.

pub mod profile_service;
pub mod recipe_collection;
pub mod recipe_generation;
pub mod services;
pub mod session;
pub mod turn_controller;

#[cfg(test)]
mod test_support;

pub use profile_service::ProfileService;
pub use recipe_collection::RecipeCollection;
pub use recipe_generation::{GenerationOutcome, GenerationStores, RecipeGenerationCoordinator};
pub use services::LutongServices;
pub use session::SessionManager;
pub use turn_controller::{ConversationTurnController, TurnOutcome};
