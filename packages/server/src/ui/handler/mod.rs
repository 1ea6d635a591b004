//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{create_group, get_direct_messages, get_room_messages, health_check, list_groups};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
