//! Data Transfer Objects (DTOs) for persistence.
//!
//! Each record kind has versioned DTOs and a migrator factory. Older files are
//! upgraded on load; saves always write the latest version.

mod chat_message;
mod chat_session;
mod recipe;
mod user_profile;

pub use chat_message::{ChatMessageV1_0_0, create_chat_message_migrator};
pub use chat_session::{ChatSessionV1_0_0, StoredMessage, create_chat_session_migrator};
pub use recipe::{RecipeV1_0_0, RecipeV1_1_0, create_recipe_migrator};
pub use user_profile::{UserProfileV1_0_0, create_user_profile_migrator};
