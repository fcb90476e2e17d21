//! External generation collaborators.
//!
//! These traits wrap the language-model and image calls. Implementations are
//! expected to own their own timeouts and retries; a returned `Err` is final.

use async_trait::async_trait;

use crate::error::Result;
use crate::recipe::RecipeDraft;
use crate::session::ChatMessage;
use crate::user::UserProfile;

/// Marker the reply model appends once it has enough to propose a recipe.
pub const READY_SENTINEL: &str = "[GENERATE_RECIPE_READY]";

/// Assistant text substituted when reply generation fails.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble responding right now. Please try again!";

/// A reply with the ready marker already separated from the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    pub ready_signal_present: bool,
}

impl GeneratedReply {
    /// Splits raw model text into display text and the ready flag.
    pub fn from_raw(raw: &str) -> Self {
        let ready_signal_present = raw.contains(READY_SENTINEL);
        let text = raw.replacen(READY_SENTINEL, "", 1).trim().to_string();
        Self {
            text,
            ready_signal_present,
        }
    }
}

#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// `context` holds the most recent prior messages followed by the new user message.
    async fn generate_reply(
        &self,
        context: &[ChatMessage],
        profile: &UserProfile,
    ) -> Result<GeneratedReply>;
}

#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// `attempt` is 0 for the initial generation and `k` for the k-th regeneration.
    async fn generate_recipe_draft(
        &self,
        conversation: &[ChatMessage],
        profile: &UserProfile,
        attempt: u32,
    ) -> Result<RecipeDraft>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns an image reference (URL or data URI).
    async fn generate_image(&self, dish_name: &str, description: &str) -> Result<String>;
}

/// Image reference used when image generation fails.
pub fn placeholder_image(dish_name: &str) -> String {
    let query = format!("Filipino dish {} photography", dish_name);
    format!(
        "/placeholder.svg?height=300&width=400&query={}",
        urlencoding::encode(&query)
    )
}
