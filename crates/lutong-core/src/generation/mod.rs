//! Recipe generation contracts.
//!
//! - `collaborator`: the opaque reply, recipe and image generators
//! - `ledger`: per-scope regeneration state and the idempotency-key store

mod collaborator;
mod ledger;

pub use collaborator::{
    FALLBACK_REPLY, GeneratedReply, ImageGenerator, READY_SENTINEL, RecipeGenerator,
    ReplyGenerator, placeholder_image,
};
pub use ledger::{
    Acquisition, Completion, GLOBAL_SCOPE, GenerationLedger, InFlight, MAX_REGENERATIONS,
    RegenerationState, scope_for,
};
