//! Process configuration.

pub mod types;

pub use types::AppConfig;
