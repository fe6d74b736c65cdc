//! HTTP server for the Prometheus metrics endpoint.

use super::Exporter;
use crate::protocol::ReportSource;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
    /// Path serving the metrics exposition.
    pub endpoint: String,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 9191).into(),
            endpoint: "/metrics".to_owned(),
        }
    }
}

/// HTTP server exposing one [`Exporter`].
///
/// Every request to the metrics endpoint triggers exactly one NIS poll.
pub struct MetricsServer<S> {
    config: MetricsServerConfig,
    exporter: Arc<Exporter<S>>,
}

impl<S> MetricsServer<S>
where
    S: ReportSource + Send + Sync + 'static,
{
    /// Creates a new metrics server.
    pub fn new(config: MetricsServerConfig, exporter: Exporter<S>) -> Self {
        Self {
            config,
            exporter: Arc::new(exporter),
        }
    }

    /// Returns the shared exporter.
    pub fn exporter(&self) -> Arc<Exporter<S>> {
        Arc::clone(&self.exporter)
    }

    /// Builds the router without binding.
    pub fn router(&self) -> Router {
        Router::new()
            .route(&self.config.endpoint, get(metrics_handler::<S>))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.exporter))
    }

    /// Starts the HTTP server.
    ///
    /// Runs until `shutdown` resolves.
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            endpoint = %self.config.endpoint,
            "Metrics server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Handler for the metrics endpoint.
async fn metrics_handler<S>(State(exporter): State<Arc<Exporter<S>>>) -> impl IntoResponse
where
    S: ReportSource + Send + Sync + 'static,
{
    // The NIS round trip is blocking I/O.
    let result = tokio::task::spawn_blocking(move || exporter.scrape()).await;

    match result {
        Ok(Ok(output)) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Scrape task failed: {}", e),
        ),
    }
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
