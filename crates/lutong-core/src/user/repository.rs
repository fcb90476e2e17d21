//! Profile repository trait.

use super::model::UserProfile;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for the singleton [`UserProfile`].
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns the stored profile, or `None` before onboarding.
    async fn get_profile(&self) -> Result<Option<UserProfile>>;

    /// Stores the profile, replacing any previous one.
    async fn put_profile(&self, profile: &UserProfile) -> Result<()>;
}
