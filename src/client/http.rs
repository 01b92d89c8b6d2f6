//! Upstream HTTP Client
//!
//! Sends exactly one `generateContent` call per request. No retries, no
//! timeout beyond the transport default.

use crate::api::{GenerateContentRequest, GenerateContentResponse, UpstreamErrorBody};
use crate::config::UpstreamConfig;
use crate::error::{GatewayError, Result, UPSTREAM_ERROR_FALLBACK};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;

/// Header carrying the upstream credential
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the generative-content endpoint
pub struct UpstreamClient {
    /// Inner reqwest client, shared by all requests
    client: Client,

    /// Full `...:generateContent` URL
    endpoint: String,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self { client, endpoint })
    }

    /// URL every request is sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make one `generateContent` call authenticated with `api_key`.
    ///
    /// A non-success status becomes [`GatewayError::UpstreamApplication`]
    /// with the same status; a success body that is not the expected JSON
    /// becomes [`GatewayError::UpstreamContract`].
    pub async fn generate_content(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(api_key)
                .map_err(|e| GatewayError::Internal(format!("Invalid API key format: {}", e)))?,
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = UpstreamErrorBody::message_from(&text)
                .unwrap_or_else(|| UPSTREAM_ERROR_FALLBACK.to_string());
            return Err(GatewayError::UpstreamApplication {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            GatewayError::UpstreamContract(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                truncate(&text, 500)
            ))
        })
    }
}

/// Cut `text` to at most `max` bytes on a char boundary
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
