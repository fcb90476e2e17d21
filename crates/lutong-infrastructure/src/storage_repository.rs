use lutong_core::LutongError;
use std::path::Path;
use version_migrate::{AsyncDirStorage, MigrationError};

/// Common surface of the `AsyncDirStorage`-backed repositories.
pub trait StorageRepository {
    /// Collection directory name.
    const COLLECTION: &'static str;

    /// Entity name registered with the migrator.
    const ENTITY_NAME: &'static str;

    fn storage(&self) -> &AsyncDirStorage;

    /// Directory holding this collection's record files.
    fn collection_dir(&self) -> &Path {
        self.storage().base_path()
    }
}

/// Converts a load error, mapping a missing record to `Ok(None)`.
pub(crate) fn missing_as_none<T>(
    result: Result<T, MigrationError>,
) -> Result<Option<T>, LutongError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let err = LutongError::from(e);
            if err.is_not_found_or_missing() {
                Ok(None)
            } else {
                Err(err)
            }
        }
    }
}

/// Converts a delete error, treating an already-missing record as success.
pub(crate) fn missing_as_ok(result: Result<(), MigrationError>) -> Result<(), LutongError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            let err = LutongError::from(e);
            if err.is_not_found_or_missing() {
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}
