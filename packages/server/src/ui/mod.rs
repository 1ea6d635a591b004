//! WebSocket chat server implementation.

mod handler;
mod runner;
pub mod session;
mod signal;
pub mod state;

pub use runner::{build_cors, build_router, run};
pub use session::ConnectionSession;
pub use state::AppState;
