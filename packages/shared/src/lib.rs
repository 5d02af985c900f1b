//! Shared utilities for Scoreline packages.

pub mod logger;
pub mod time;
