//! Client-Facing API
//!
//! Request and response bodies of `POST /api/generate-image`.

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};

/// Image generation request sent by the browser client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Text description of the image, never empty
    pub prompt: String,
}

impl GenerateRequest {
    /// Parse and validate a raw request body.
    ///
    /// Anything other than a JSON object with a non-empty string `prompt`
    /// is a validation error.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| GatewayError::Validation(format!("Body is not valid JSON: {}", e)))?;

        match value.get("prompt").and_then(|p| p.as_str()) {
            Some(prompt) if !prompt.is_empty() => Ok(Self {
                prompt: prompt.to_string(),
            }),
            Some(_) => Err(GatewayError::Validation("prompt is empty".to_string())),
            None => Err(GatewayError::Validation(
                "prompt is missing or not a string".to_string(),
            )),
        }
    }
}

/// Successful generation: raw base64 image bytes, no data-URI prefix
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub base64_data: String,
}

/// Error body returned for every failure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub keys: usize,
    pub leases: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_prompt() {
        let request = GenerateRequest::from_slice(br#"{"prompt": "a cute kitten"}"#).unwrap();
        assert_eq!(request.prompt, "a cute kitten");
    }

    #[test]
    fn test_missing_prompt() {
        let err = GenerateRequest::from_slice(b"{}").unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn test_empty_prompt() {
        let err = GenerateRequest::from_slice(br#"{"prompt": ""}"#).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn test_non_string_prompt() {
        assert!(GenerateRequest::from_slice(br#"{"prompt": 42}"#).is_err());
        assert!(GenerateRequest::from_slice(br#"{"prompt": null}"#).is_err());
        assert!(GenerateRequest::from_slice(br#"["prompt"]"#).is_err());
    }

    #[test]
    fn test_malformed_body() {
        assert!(GenerateRequest::from_slice(b"prompt=kitten").is_err());
        assert!(GenerateRequest::from_slice(b"").is_err());
    }

    #[test]
    fn test_whitespace_prompt_is_accepted() {
        let request = GenerateRequest::from_slice(br#"{"prompt": " "}"#).unwrap();
        assert_eq!(request.prompt, " ");
    }

    #[test]
    fn test_response_uses_camel_case() {
        let response = GenerateResponse {
            base64_data: "AAAA".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "base64Data": "AAAA" }));
    }
}
