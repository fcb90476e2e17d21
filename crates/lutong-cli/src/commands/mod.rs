pub mod history;
pub mod profile;
pub mod recipes;
pub mod sessions;
pub mod store;
