//! Real-time scoreboard server with group-scoped broadcast.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin scoreline-server
//! cargo run --bin scoreline-server -- --host 0.0.0.0 --port 3000 --max-groups 10
//! ```

use std::sync::Arc;

use clap::Parser;
use scoreline_server::{
    config::ServerConfig,
    ui::{AppState, Server},
};
use scoreline_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_PKG_NAME"), "tower_http"], &config.log_level);

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let limits = config.group_limits();
    tracing::info!(
        "Limits: {} group(s), {} connection(s) per group, lifetime {:?}",
        limits.max_groups,
        limits.max_connections_per_group,
        limits.group_lifetime
    );

    // Registry, store and pusher are in-memory; use cases are wired inside AppState
    let state = AppState::in_memory(Arc::new(SystemClock), limits, config.initial_timer());

    let server = Server::new(state).with_reclaim_interval(config.reclaim_interval());
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
