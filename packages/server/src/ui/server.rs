//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_group_connected, get_group_detail, get_groups, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the router: WebSocket gateway plus the read-only HTTP API.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/groups", get(get_groups))
        .route("/api/groups/{group_name}", get(get_group_detail))
        .route("/api/groups/{group_name}/connected", get(get_group_connected))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Real-time scoreboard server
///
/// # Example
///
/// ```ignore
/// let state = AppState::in_memory(Arc::new(SystemClock), GroupLimits::default(), Timer::default());
/// let server = Server::new(state).with_reclaim_interval(Some(Duration::from_secs(60)));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// 定期回収の間隔（None なら参加時の回収のみ）
    reclaim_interval: Option<Duration>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            reclaim_interval: None,
        }
    }

    pub fn with_reclaim_interval(mut self, reclaim_interval: Option<Duration>) -> Self {
        self.reclaim_interval = reclaim_interval;
        self
    }

    /// Bind to `host:port` and serve until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Scoreboard server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let reclaim_task = self.reclaim_interval.map(|period| {
            tracing::info!("Periodic group reclamation every {:?}", period);
            self.state.lifecycle.clone().spawn_periodic_reclaim(period)
        });

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Some(task) = reclaim_task {
            task.abort();
        }
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
