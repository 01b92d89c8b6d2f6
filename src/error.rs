//! Gateway Error Types
//!
//! Error taxonomy for the relay and its mapping onto the client-facing contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::ErrorResponse;

/// Message returned for a missing or empty prompt
pub const PROMPT_REQUIRED: &str = "Prompt is required.";

/// Message returned when the upstream call could not be completed
pub const UNKNOWN_SERVER_ERROR: &str = "An unknown server error occurred.";

/// Message returned when a successful upstream response carries no image
pub const NO_VALID_IMAGE: &str = "API response did not contain a valid image.";

/// Fallback when the upstream error body has no usable message
pub const UPSTREAM_ERROR_FALLBACK: &str = "API error";

/// Main error type for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Startup configuration problem (no credentials, bad config file, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client input rejected before any credential is leased
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The upstream call could not be completed (DNS, connect, read)
    #[error("Upstream request failed: {0}")]
    UpstreamTransport(String),

    /// The upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    UpstreamApplication { status: u16, message: String },

    /// The upstream answered with success but without a usable image
    #[error("Upstream contract violation: {0}")]
    UpstreamContract(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status presented to the client
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamApplication { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            GatewayError::Config(_)
            | GatewayError::UpstreamTransport(_)
            | GatewayError::UpstreamContract(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message presented to the client. Internal detail stays in the logs.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Validation(_) => PROMPT_REQUIRED.to_string(),
            GatewayError::UpstreamApplication { message, .. } => message.clone(),
            GatewayError::UpstreamContract(_) => NO_VALID_IMAGE.to_string(),
            GatewayError::Config(_)
            | GatewayError::UpstreamTransport(_)
            | GatewayError::Internal(_) => UNKNOWN_SERVER_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::UpstreamTransport(format!("Timed out: {}", err))
        } else if err.is_connect() {
            GatewayError::UpstreamTransport(format!("Connection failed: {}", err))
        } else {
            GatewayError::UpstreamTransport(err.to_string())
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Config(format!("IO error: {}", err))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.client_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let response = GatewayError::Validation("missing prompt".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Prompt is required." })
        );
    }

    #[tokio::test]
    async fn test_upstream_status_is_passed_through() {
        let err = GatewayError::UpstreamApplication {
            status: 403,
            message: "quota exceeded".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "quota exceeded" })
        );
    }

    #[tokio::test]
    async fn test_transport_detail_is_not_leaked() {
        let err = GatewayError::UpstreamTransport("dns error: no such host".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": UNKNOWN_SERVER_ERROR })
        );
    }

    #[test]
    fn test_contract_violation_message() {
        let err = GatewayError::UpstreamContract("no candidates".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), NO_VALID_IMAGE);
    }

    #[test]
    fn test_invalid_upstream_status_falls_back_to_500() {
        let err = GatewayError::UpstreamApplication {
            status: 42,
            message: "odd".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
