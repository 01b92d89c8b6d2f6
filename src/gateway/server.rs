//! HTTP Server
//!
//! Serves the client-facing contract with axum:
//! - `POST /api/generate-image` relays a prompt through the gateway
//! - `GET /api/health` reports pool size and lease count
//!
//! CORS allows every origin; no cookies or credentials are exchanged.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{GenerateResponse, HealthResponse};
use crate::error::{GatewayError, Result};
use crate::gateway::RelayGateway;

/// Path of the generation endpoint
pub const GENERATE_PATH: &str = "/api/generate-image";

/// Path of the health endpoint
pub const HEALTH_PATH: &str = "/api/health";

/// HTTP server wrapping a [`RelayGateway`]
pub struct HttpServer {
    gateway: Arc<RelayGateway>,
}

impl HttpServer {
    pub fn new(gateway: Arc<RelayGateway>) -> Self {
        Self { gateway }
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        router(self.gateway.clone())
    }

    /// Bind `addr` and serve until Ctrl-C
    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let local: SocketAddr = listener.local_addr()?;
        info!("Server is running on http://{}", local);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Internal(format!("Server error: {}", e)))?;

        info!("Server stopped");
        Ok(())
    }
}

/// Build the application router around a gateway
pub fn router(gateway: Arc<RelayGateway>) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_image))
        .route(HEALTH_PATH, get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}

/// Relays the prompt in its own task so a client disconnect does not cancel
/// an upstream call that already started.
async fn generate_image(
    State(gateway): State<Arc<RelayGateway>>,
    body: Bytes,
) -> std::result::Result<Json<GenerateResponse>, GatewayError> {
    let task = tokio::spawn(async move { gateway.handle_generate(&body).await });

    match task.await {
        Ok(result) => result.map(Json),
        Err(join_err) => {
            error!(error = %join_err, "Relay task failed");
            Err(GatewayError::Internal(join_err.to_string()))
        }
    }
}

async fn health(State(gateway): State<Arc<RelayGateway>>) -> Json<HealthResponse> {
    let stats = gateway.pool().stats();
    Json(HealthResponse {
        status: "ok".to_string(),
        keys: stats.total_keys,
        leases: stats.total_leases,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::UpstreamClient;
    use crate::config::UpstreamConfig;
    use crate::pool::KeyPool;

    fn test_gateway() -> Arc<RelayGateway> {
        let pool = KeyPool::new(vec!["k1".to_string(), "k2".to_string()]).unwrap();
        let upstream = UpstreamClient::new(&UpstreamConfig::default()).unwrap();
        Arc::new(RelayGateway::new(Arc::new(pool), upstream))
    }

    #[tokio::test]
    async fn test_health_reports_pool() {
        let Json(body) = health(State(test_gateway())).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.keys, 2);
        assert_eq!(body.leases, 0);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_prompt() {
        let gateway = test_gateway();
        let result = generate_image(
            State(gateway.clone()),
            Bytes::from_static(br#"{"prompt": ""}"#),
        )
        .await;

        assert!(matches!(result, Err(GatewayError::Validation(_))));
        assert_eq!(gateway.pool().stats().total_leases, 0);
    }
}
