//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{get_group_connected, get_group_detail, get_groups, health_check};
pub use websocket::websocket_handler;
