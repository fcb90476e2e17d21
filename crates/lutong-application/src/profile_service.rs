//! Single-device user onboarding.

use std::sync::Arc;

use lutong_core::error::{LutongError, Result};
use lutong_core::user::{ProfileRepository, UserProfile};

pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Stores a fresh profile, replacing any existing one.
    pub async fn register(&self, name: &str) -> Result<UserProfile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LutongError::invalid_input("name must not be empty"));
        }

        let profile = UserProfile::new(name);
        self.profiles.put_profile(&profile).await?;
        tracing::info!("[ProfileService] Registered '{}'", profile.name);
        Ok(profile)
    }

    /// `None` means onboarding has not happened yet.
    pub async fn current(&self) -> Result<Option<UserProfile>> {
        self.profiles.get_profile().await
    }

    /// The stored profile, or a transient one named `fallback_name`.
    pub async fn current_or(&self, fallback_name: &str) -> Result<UserProfile> {
        Ok(self
            .current()
            .await?
            .unwrap_or_else(|| UserProfile::new(fallback_name)))
    }
}
