//! imagegate - Image Generation Relay
//!
//! A small HTTP backend that relays text prompts to a generative-image API.
//! Upstream API keys are pooled and rotated round-robin, never exposed to the
//! client, and upstream failures are normalized into a stable
//! `{ "error": ... }` contract.

use std::sync::Arc;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod pool;

pub use api::{ErrorResponse, GenerateRequest, GenerateResponse, HealthResponse};
pub use config::{ConfigLoader, GatewayConfig};
pub use error::{GatewayError, Result};
pub use gateway::{HttpServer, RelayGateway};
pub use pool::{ApiKey, KeyPool, KeyPoolStats};

/// Build a ready-to-run server around an initialized key pool.
///
/// The pool is built first (see [`KeyPool::from_env`]) so a missing
/// credential fails startup before anything is bound.
pub fn build_server(config: &GatewayConfig, pool: KeyPool) -> Result<HttpServer> {
    tracing::info!(keys = pool.len(), "Loaded API key pool");

    let gateway = RelayGateway::from_config(config, Arc::new(pool))?;
    Ok(HttpServer::new(Arc::new(gateway)))
}
