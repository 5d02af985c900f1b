//! Data Transfer Objects (DTOs) for the scoreboard server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (inbound client messages, outbound events)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
