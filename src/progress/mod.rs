//! Job-scoped pub/sub for streaming crawl progress to WebSocket clients.

pub mod hub;
pub mod types;

pub use hub::ProgressHub;
pub use types::{ClientMessage, ServerMessage};
