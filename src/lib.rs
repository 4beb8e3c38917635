// Public API for integration tests and embedding

pub mod config;
pub mod effects;
pub mod error;
pub mod handlers;
pub mod names;
pub mod prefs;
pub mod presenter;
pub mod protocol;
pub mod random;
pub mod state;
pub mod types;
pub mod wheel;
