//! Scoreline server library.
//!
//! Group-scoped real-time scoreboard state: clients join named groups over
//! WebSocket and every update is broadcast to the other members of the group.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
