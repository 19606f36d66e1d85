//! HTTP exporter for session metrics.
//!
//! `/metrics` serves the Prometheus registry; `/health` reports the
//! controller state and overlay size from the most recent snapshot.

use crate::metrics::{MetricsRegistry, MetricsSnapshot};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

/// Errors that can occur while serving metrics.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self::with_port(9090)
    }
}

impl MetricsServerConfig {
    /// Creates a config with a custom port on the loopback interface.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], port).into(),
        }
    }
}

/// Registry plus the snapshot it was last updated from.
pub struct MetricsState {
    registry: MetricsRegistry,
    latest: MetricsSnapshot,
}

impl MetricsState {
    /// Publishes a new controller snapshot.
    pub fn update(&mut self, snapshot: MetricsSnapshot) {
        self.registry.update(&snapshot);
        self.latest = snapshot;
    }

    /// The snapshot currently being served.
    pub fn latest(&self) -> &MetricsSnapshot {
        &self.latest
    }

    fn health_line(&self) -> String {
        format!(
            "{} overlay_elements={}\n",
            self.latest.state, self.latest.overlay_elements
        )
    }
}

type SharedState = Arc<RwLock<MetricsState>>;

/// HTTP server exposing the session metrics.
pub struct MetricsServer {
    config: MetricsServerConfig,
    state: SharedState,
}

impl MetricsServer {
    /// Creates a server that starts out reporting an idle controller.
    pub fn new(config: MetricsServerConfig, registry: MetricsRegistry) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(MetricsState {
                registry,
                latest: MetricsSnapshot::default(),
            })),
        }
    }

    /// Handle for publishing snapshots while the server runs.
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state())
    }

    /// Binds and serves until the task is dropped.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Metrics server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))
    }
}

async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match state.read().await.registry.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain; charset=utf-8")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

async fn health_handler(State(state): State<SharedState>) -> String {
    state.read().await.health_line()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    fn server() -> MetricsServer {
        MetricsServer::new(
            MetricsServerConfig::with_port(0),
            MetricsRegistry::new().unwrap(),
        )
    }

    #[test]
    fn test_config_default() {
        let config = MetricsServerConfig::default();
        assert_eq!(config.bind_addr.port(), 9090);
        assert!(config.bind_addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn test_update_is_served_as_metrics() {
        let server = server();
        let state = server.state();
        state.write().await.update(MetricsSnapshot {
            captures: 3,
            ..Default::default()
        });

        let output = state.read().await.registry.encode().unwrap();
        assert!(output.contains("camera_overlay_captures_total 3"));
    }

    #[tokio::test]
    async fn test_health_reports_session_state() {
        let server = server();
        let state = server.state();
        assert_eq!(
            health_handler(State(server.state())).await,
            "IDLE overlay_elements=0\n"
        );

        state.write().await.update(MetricsSnapshot {
            state: SessionState::Running,
            overlay_elements: 3,
            sessions_started: 1,
            ..Default::default()
        });
        assert_eq!(
            health_handler(State(server.state())).await,
            "RUNNING overlay_elements=3\n"
        );
        assert_eq!(state.read().await.latest().sessions_started, 1);
    }
}
