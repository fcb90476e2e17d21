//! UserProfile domain model.

use serde::{Deserialize, Serialize};

/// Fixed storage key of the singleton profile record.
pub const PROFILE_KEY: &str = "current-user";

/// The person using this device.
///
/// Created once at onboarding and only ever replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Name used to greet the user and personalize prompts
    pub name: String,
    /// Timestamp of onboarding (RFC 3339)
    pub created_at: String,
}

impl UserProfile {
    /// Creates a profile stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: crate::time::now(),
        }
    }
}
