//! User domain module.
//!
//! - `model`: the single-device user profile
//! - `repository`: persistence contract for the profile

mod model;
mod repository;

pub use model::{PROFILE_KEY, UserProfile};
pub use repository::ProfileRepository;
