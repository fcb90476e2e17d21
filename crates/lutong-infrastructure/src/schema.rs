//! Store manifest and additive schema upgrades.

use serde::{Deserialize, Serialize};

use crate::storage::AtomicTomlError;
use lutong_core::LutongError;

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// Collections introduced by each schema version, oldest first.
const COLLECTIONS_BY_VERSION: &[(u32, &[&str])] = &[
    (1, &["profile", "recipes", "chat_messages"]),
    (2, &["chat_sessions", "generation"]),
];

/// `store.toml` at the root of the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreManifest {
    /// 0 means "no manifest yet".
    pub schema_version: u32,
    #[serde(default)]
    pub collections: Vec<String>,
}

impl StoreManifest {
    /// Brings the manifest up to [`SCHEMA_VERSION`], returning the collections it added.
    ///
    /// Upgrades are additive only. A manifest written by a newer build is rejected.
    pub fn upgrade(&mut self) -> Result<Vec<String>, AtomicTomlError> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(AtomicTomlError::Rejected(LutongError::migration(format!(
                "store schema version {} is newer than supported version {}",
                self.schema_version, SCHEMA_VERSION
            ))));
        }

        let mut added = Vec::new();
        for (_, collections) in COLLECTIONS_BY_VERSION {
            for name in collections.iter() {
                if !self.collections.iter().any(|c| c == name) {
                    self.collections.push(name.to_string());
                    added.push(name.to_string());
                }
            }
        }
        self.schema_version = SCHEMA_VERSION;
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_manifest_gets_all_collections() {
        let mut manifest = StoreManifest::default();
        let added = manifest.upgrade().unwrap();
        assert_eq!(manifest.schema_version, SCHEMA_VERSION);
        assert_eq!(
            added,
            vec!["profile", "recipes", "chat_messages", "chat_sessions", "generation"]
        );
    }

    #[test]
    fn test_v1_manifest_upgrade_is_additive() {
        let mut manifest = StoreManifest {
            schema_version: 1,
            collections: vec![
                "profile".to_string(),
                "recipes".to_string(),
                "chat_messages".to_string(),
            ],
        };
        let added = manifest.upgrade().unwrap();
        assert_eq!(added, vec!["chat_sessions", "generation"]);
        assert_eq!(manifest.collections.len(), 5);
        assert!(manifest.upgrade().unwrap().is_empty());
    }

    #[test]
    fn test_newer_manifest_is_rejected() {
        let mut manifest = StoreManifest {
            schema_version: SCHEMA_VERSION + 1,
            collections: vec![],
        };
        let err: LutongError = manifest.upgrade().unwrap_err().into();
        assert!(matches!(err, LutongError::Migration(_)));
        assert!(err.is_storage());
    }
}
