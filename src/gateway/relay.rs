//! Relay Gateway
//!
//! Turns one client request into exactly one upstream call:
//! validate, lease a key, call, map the result.

use crate::api::{GenerateContentRequest, GenerateRequest, GenerateResponse};
use crate::client::UpstreamClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::pool::KeyPool;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Stateless request handler in front of a shared [`KeyPool`]
pub struct RelayGateway {
    pool: Arc<KeyPool>,
    upstream: UpstreamClient,
}

impl RelayGateway {
    pub fn new(pool: Arc<KeyPool>, upstream: UpstreamClient) -> Self {
        Self { pool, upstream }
    }

    /// Build the gateway from config and an already-initialized pool
    pub fn from_config(config: &GatewayConfig, pool: Arc<KeyPool>) -> Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        Ok(Self::new(pool, upstream))
    }

    /// The shared key pool
    pub fn pool(&self) -> &Arc<KeyPool> {
        &self.pool
    }

    /// Handle one raw `POST /api/generate-image` body.
    ///
    /// Validation failures return before a key is leased.
    pub async fn handle_generate(&self, body: &[u8]) -> Result<GenerateResponse> {
        let request = GenerateRequest::from_slice(body)?;

        let key = self.pool.lease_next();
        info!(key_index = key.index(), "Using API key");

        let upstream_request = GenerateContentRequest::image_prompt(&request.prompt);
        let response = match self
            .upstream
            .generate_content(key.value(), &upstream_request)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                log_upstream_failure(key.index(), &err);
                return Err(err);
            }
        };

        match response.first_inline_image() {
            Ok(data) => Ok(GenerateResponse {
                base64_data: data.to_string(),
            }),
            Err(missing) => {
                error!(key_index = key.index(), reason = %missing, "Upstream returned no image");
                Err(GatewayError::UpstreamContract(missing.to_string()))
            }
        }
    }
}

fn log_upstream_failure(key_index: usize, err: &GatewayError) {
    match err {
        GatewayError::UpstreamApplication { status, message } => {
            warn!(key_index, status, %message, "Upstream API error");
        }
        other => {
            error!(key_index, error = %other, "Upstream call failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;

    fn gateway(base_url: &str, keys: &[&str]) -> RelayGateway {
        let pool = KeyPool::new(keys.iter().map(|k| k.to_string()).collect()).unwrap();
        let upstream = UpstreamClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            model: "m".to_string(),
        })
        .unwrap();
        RelayGateway::new(Arc::new(pool), upstream)
    }

    #[tokio::test]
    async fn test_validation_does_not_lease() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let gateway = gateway(&server.url(), &["k1", "k2"]);

        let bodies: [&[u8]; 3] = [b"{}", br#"{"prompt": ""}"#, b"garbage"];
        for body in bodies {
            let err = gateway.handle_generate(body).await.unwrap_err();
            assert!(matches!(err, GatewayError::Validation(_)));
        }

        assert_eq!(gateway.pool().stats().total_leases, 0);
        // Cursor untouched: first real lease is still key 0.
        assert_eq!(gateway.pool().lease_next().value(), "k1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_success_returns_image_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/m:generateContent")
            .match_header("x-goog-api-key", "k1")
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"AAAA"}}]}}]}"#)
            .create_async()
            .await;

        let gateway = gateway(&server.url(), &["k1"]);
        let response = gateway
            .handle_generate(br#"{"prompt": "a cute kitten"}"#)
            .await
            .unwrap();

        assert_eq!(response.base64_data, "AAAA");
    }

    #[tokio::test]
    async fn test_text_only_response_is_contract_violation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/m:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw that"}]}}]}"#)
            .create_async()
            .await;

        let gateway = gateway(&server.url(), &["k1"]);
        let err = gateway
            .handle_generate(br#"{"prompt": "x"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::UpstreamContract(_)));
    }

    #[tokio::test]
    async fn test_failure_does_not_skip_next_key() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/v1beta/models/m:generateContent")
            .match_header("x-goog-api-key", "k1")
            .with_status(429)
            .with_body(r#"{"error":{"message":"quota exceeded"}}"#)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/v1beta/models/m:generateContent")
            .match_header("x-goog-api-key", "k2")
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"BBBB"}}]}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let gateway = gateway(&server.url(), &["k1", "k2"]);

        let err = gateway
            .handle_generate(br#"{"prompt": "x"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamApplication { status: 429, .. }));

        let ok = gateway.handle_generate(br#"{"prompt": "x"}"#).await.unwrap();
        assert_eq!(ok.base64_data, "BBBB");

        first.assert_async().await;
        second.assert_async().await;
    }
}
