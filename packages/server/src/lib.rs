//! Hiroba chat server library.
//!
//! Real-time rooms, direct messages and presence over WebSocket,
//! with message history and a group catalog over HTTP.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{AppState, build_cors, build_router, run};
