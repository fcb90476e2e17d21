//! UserProfile DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use lutong_core::user::UserProfile;

/// User profile V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct UserProfileV1_0_0 {
    /// Name shown in greetings.
    pub name: String,
    /// Onboarding timestamp (RFC 3339).
    pub created_at: String,
}

impl IntoDomain<UserProfile> for UserProfileV1_0_0 {
    fn into_domain(self) -> UserProfile {
        UserProfile {
            name: self.name,
            created_at: self.created_at,
        }
    }
}

impl FromDomain<UserProfile> for UserProfileV1_0_0 {
    fn from_domain(profile: UserProfile) -> Self {
        UserProfileV1_0_0 {
            name: profile.name,
            created_at: profile.created_at,
        }
    }
}

/// Creates and configures a Migrator instance for UserProfile entities.
pub fn create_user_profile_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let profile_path = version_migrate::Migrator::define("user_profile")
        .from::<UserProfileV1_0_0>()
        .into_with_save::<UserProfile>();

    migrator
        .register(profile_path)
        .expect("Failed to register user_profile migration path");

    migrator
}
