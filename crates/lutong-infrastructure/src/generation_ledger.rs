//! File-backed generation ledger.
//!
//! One TOML record per generation scope under `generation/`. Every operation is
//! a locked read-modify-write through [`AtomicTomlFile`], which gives the
//! compare-and-set the coordinator relies on for deduplication.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lutong_core::error::{LutongError, Result};
use lutong_core::generation::{Acquisition, Completion, GenerationLedger, RegenerationState};

use crate::storage::{AtomicTomlError, AtomicTomlFile};

pub struct FileGenerationLedger {
    dir: PathBuf,
}

impl FileGenerationLedger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, scope: &str) -> AtomicTomlFile<RegenerationState> {
        AtomicTomlFile::new(self.dir.join(format!("{}.toml", file_stem(scope))))
    }

    async fn update<F, R>(&self, scope: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut RegenerationState) -> std::result::Result<R, AtomicTomlError>
            + Send
            + 'static,
        R: Send + 'static,
    {
        let file = self.file_for(scope);
        let default = RegenerationState::empty(scope);
        tokio::task::spawn_blocking(move || file.update(default, f))
            .await
            .map_err(|e| LutongError::internal(format!("Ledger task failed: {}", e)))?
            .map_err(Into::into)
    }
}

/// Percent-encodes the scope so distinct scopes never share a file and no
/// path separator survives.
fn file_stem(scope: &str) -> String {
    urlencoding::encode(scope).into_owned()
}

#[async_trait]
impl GenerationLedger for FileGenerationLedger {
    async fn acquire(&self, scope: &str, attempt: u32, stale_after: Duration) -> Result<Acquisition> {
        let scope_name = scope.to_string();
        self.update(scope, move |state| {
            let previous = state.in_progress.clone();
            let acquisition = state.acquire(attempt, Utc::now(), stale_after);
            if let (Acquisition::Granted { .. }, Some(stale)) = (&acquisition, previous) {
                tracing::warn!(
                    "[GenerationLedger] Taking over stale generation for '{}' (attempt {}, started {})",
                    scope_name,
                    stale.attempt,
                    stale.started_at
                );
            }
            Ok(acquisition)
        })
        .await
    }

    async fn complete(
        &self,
        scope: &str,
        token: &str,
        attempt: u32,
        recipe_id: &str,
    ) -> Result<Completion> {
        let token = token.to_string();
        let recipe_id = recipe_id.to_string();
        self.update(scope, move |state| {
            if state.finish(&token, attempt, recipe_id) {
                Ok(Completion::Recorded(state.clone()))
            } else {
                Ok(Completion::Superseded(state.clone()))
            }
        })
        .await
    }

    async fn release(&self, scope: &str, token: &str) -> Result<()> {
        let token = token.to_string();
        let scope_name = scope.to_string();
        self.update(scope, move |state| {
            if !state.abandon(&token) {
                tracing::debug!(
                    "[GenerationLedger] Release of '{}' ignored: marker owned elsewhere",
                    scope_name
                );
            }
            Ok(())
        })
        .await
    }

    async fn state(&self, scope: &str) -> Result<RegenerationState> {
        let file = self.file_for(scope);
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| LutongError::internal(format!("Ledger task failed: {}", e)))??;
        Ok(loaded.unwrap_or_else(|| RegenerationState::empty(scope)))
    }
}
