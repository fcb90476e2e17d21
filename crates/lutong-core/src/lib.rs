//! Core domain types and contracts for Lutong.
//!
//! This crate holds no I/O: persistence and generation are expressed as traits
//! implemented by `lutong-infrastructure` and by collaborator adapters.

pub mod config;
pub mod error;
pub mod generation;
pub mod recipe;
pub mod session;
pub mod time;
pub mod user;

pub use error::{LutongError, Result};
