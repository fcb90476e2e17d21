//! Configuration loading.

use std::path::Path;

use lutong_core::config::LutongConfig;
use lutong_core::error::{LutongError, Result};

use crate::paths::LutongPaths;
use crate::storage::AtomicTomlFile;

/// Loads `config.toml` from the platform config directory and applies env overrides.
pub fn load_config() -> Result<LutongConfig> {
    let path = LutongPaths::config_file()?;
    Ok(load_config_from(&path)?.with_env_overrides())
}

/// Loads a config file. A missing file is created with defaults; a malformed one is an error.
pub fn load_config_from(path: &Path) -> Result<LutongConfig> {
    let file = AtomicTomlFile::<LutongConfig>::new(path);
    match file.load() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => {
            let config = LutongConfig::default();
            if let Err(e) = file.save(&config) {
                tracing::warn!(
                    "[Config] Could not write default config to {}: {}",
                    path.display(),
                    e
                );
            }
            Ok(config)
        }
        Err(e) => Err(LutongError::config(format!(
            "Invalid config file {}: {}",
            path.display(),
            e
        ))),
    }
}
