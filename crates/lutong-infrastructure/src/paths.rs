//! Path management for Lutong data and configuration.
//!
//! Platform directories are resolved via `AppPaths` from version-migrate so the
//! default layout matches the one `AsyncDirStorage` uses.
//!
//! ```text
//! ~/.config/lutong/config.toml     # LutongConfig
//! ~/.local/share/lutong/           # default data directory (the store)
//! ```

use std::path::{Path, PathBuf};

use lutong_core::LutongError;
use lutong_core::config::LutongConfig;
use version_migrate::{
    AppPaths, AsyncDirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy, Migrator,
    PathStrategy,
};

const APP_NAME: &str = "lutong";

/// Path resolution for one store location.
#[derive(Debug, Clone)]
pub struct LutongPaths {
    data_dir: PathBuf,
}

impl LutongPaths {
    /// Uses `data_dir` as the store root.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the store root from config, falling back to the platform data dir.
    pub fn from_config(config: &LutongConfig) -> Result<Self, LutongError> {
        match &config.data_dir {
            Some(dir) => Ok(Self::new(dir.clone())),
            None => Ok(Self::new(Self::default_data_dir()?)),
        }
    }

    pub fn default_data_dir() -> Result<PathBuf, LutongError> {
        AppPaths::new(APP_NAME)
            .data_dir()
            .map_err(|e| LutongError::config(format!("Cannot determine data directory: {}", e)))
    }

    pub fn config_dir() -> Result<PathBuf, LutongError> {
        AppPaths::new(APP_NAME)
            .config_dir()
            .map_err(|e| LutongError::config(format!("Cannot determine config directory: {}", e)))
    }

    pub fn config_file() -> Result<PathBuf, LutongError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.data_dir.join("store.toml")
    }

    pub fn active_session_file(&self) -> PathBuf {
        self.data_dir.join("active_session.txt")
    }

    pub fn generation_dir(&self) -> PathBuf {
        self.data_dir.join("generation")
    }

    /// Opens a per-record TOML directory collection under the data dir.
    pub async fn create_async_dir_storage(
        &self,
        collection: &str,
        migrator: Migrator,
    ) -> Result<AsyncDirStorage, LutongError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let paths =
            AppPaths::new(APP_NAME).data_strategy(PathStrategy::CustomBase(self.data_dir.clone()));
        let strategy = DirStorageStrategy::default()
            .with_format(FormatStrategy::Toml)
            .with_filename_encoding(FilenameEncoding::Direct);

        AsyncDirStorage::new(paths, collection, migrator, strategy)
            .await
            .map_err(|e| LutongError::storage(format!("Failed to open '{}' storage: {}", collection, e)))
    }
}
