//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides [`LutongConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "LUTONG_DATA_DIR";

/// Application configuration loaded from `config.toml`.
///
/// Every field has a default so a partial (or missing) file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LutongConfig {
    /// Directory holding the persistent store. `None` means the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Fallback log filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Number of prior messages sent to the reply collaborator.
    pub context_window: usize,
    /// Longest accepted user message, in characters.
    pub max_input_chars: usize,
    /// Age after which an unfinished generation marker is considered abandoned.
    pub generation_stale_after_secs: u64,
    /// Name used when no profile has been registered yet.
    pub user_display_fallback: String,
}

impl Default for LutongConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
            context_window: 10,
            max_input_chars: 1000,
            generation_stale_after_secs: 300,
            user_display_fallback: "Friend".to_string(),
        }
    }
}

impl LutongConfig {
    /// Applies the `LUTONG_DATA_DIR` override if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
        self
    }

    pub fn generation_stale_after(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.generation_stale_after_secs)
    }
}
