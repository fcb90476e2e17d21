//! Persistence for Lutong: versioned record collections, the generation ledger,
//! path resolution and configuration loading.

pub mod async_dir_message_log_repository;
pub mod async_dir_profile_repository;
pub mod async_dir_recipe_repository;
pub mod async_dir_session_repository;
pub mod config_service;
pub mod dto;
pub mod generation_ledger;
pub mod paths;
pub mod schema;
pub mod storage;
pub mod storage_repository;
pub mod store;

pub use crate::async_dir_message_log_repository::AsyncDirMessageLogRepository;
pub use crate::async_dir_profile_repository::AsyncDirProfileRepository;
pub use crate::async_dir_recipe_repository::AsyncDirRecipeRepository;
pub use crate::async_dir_session_repository::AsyncDirSessionRepository;
pub use crate::generation_ledger::FileGenerationLedger;
pub use crate::paths::LutongPaths;
pub use crate::store::LutongStore;
