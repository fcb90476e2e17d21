//! Error types for Lutong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Lutong workspace.
///
/// Storage-class failures (`Storage`, `Serialization`, `Migration`) are never
/// recovered locally; generation failures are recovered by the turn controller
/// but surfaced by the recipe generation coordinator.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LutongError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Underlying persistence I/O failure
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Schema upgrade or record migration failure
    #[error("Migration error: {0}")]
    Migration(String),

    /// A reply or recipe collaborator failed
    #[error("Generation failed: {message}")]
    GenerationFailed { message: String },

    /// The per-session regeneration cap was hit
    #[error(
        "Maximum regeneration limit reached (attempt {attempted}, max {max}). Start a new conversation to generate more recipes."
    )]
    RegenerationLimitExceeded { attempted: u32, max: u32 },

    /// Caller supplied input that violates a precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// State changed underneath an operation that was built on it
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LutongError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a GenerationFailed error from the collaborator's cause
    pub fn generation_failed(cause: impl std::fmt::Display) -> Self {
        Self::GenerationFailed {
            message: cause.to_string(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this belongs to the storage class (I/O, format or migration)
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Serialization { .. } | Self::Migration(_)
        )
    }

    /// Check if a collaborator failed
    pub fn is_generation_failed(&self) -> bool {
        matches!(self, Self::GenerationFailed { .. })
    }

    /// Check if the operation lost a race with another state change
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if the regeneration cap was hit
    pub fn is_regeneration_limit(&self) -> bool {
        matches!(self, Self::RegenerationLimitExceeded { .. })
    }

    /// Check if this error indicates a file/entity was not found.
    ///
    /// Returns true for `NotFound` errors and for storage errors whose
    /// message reports a missing file.
    pub fn is_not_found_or_missing(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Storage { message } | Self::Migration(message) => {
                let lower = message.to_lowercase();
                lower.contains("not found")
                    || lower.contains("no such file")
                    || lower.contains("cannot find")
            }
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LutongError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LutongError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LutongError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for LutongError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for LutongError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::TomlParseError(_) | MigrationError::TomlSerializeError(_) => {
                Self::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Storage {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, LutongError>`.
pub type Result<T> = std::result::Result<T, LutongError>;
