//! Upstream API Types
//!
//! Request and response shapes of the `generateContent` endpoint. Every level
//! of the response is optional so a malformed success body parses cleanly and
//! surfaces as a missing image rather than a decode failure.

use serde::{Deserialize, Serialize};

/// `generateContent` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

/// One content entry of a request
#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

/// A text part of a request
#[derive(Debug, Clone, Serialize)]
pub struct RequestPart {
    pub text: String,
}

/// Generation options
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

impl GenerateContentRequest {
    /// Single-turn prompt asking for both text and image output
    pub fn image_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

/// `generateContent` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

/// One candidate result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

/// Content of a candidate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

/// A content part: text, inline binary data, or something we ignore
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// Inline base64 payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub data: Option<String>,
}

/// Why a successful response carried no image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingImage {
    NoCandidates,
    NoContent,
    NoParts,
    NoInlineData,
}

impl std::fmt::Display for MissingImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            MissingImage::NoCandidates => "response has no candidates",
            MissingImage::NoContent => "first candidate has no content",
            MissingImage::NoParts => "first candidate has no parts",
            MissingImage::NoInlineData => "no part carries inline image data",
        };
        f.write_str(reason)
    }
}

impl GenerateContentResponse {
    /// Base64 data of the first inline-data part of the first candidate
    pub fn first_inline_image(&self) -> std::result::Result<&str, MissingImage> {
        let candidate = self
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or(MissingImage::NoCandidates)?;

        let parts = candidate
            .content
            .as_ref()
            .ok_or(MissingImage::NoContent)?
            .parts
            .as_ref()
            .ok_or(MissingImage::NoParts)?;

        parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find_map(|d| d.data.as_deref().filter(|data| !data.is_empty()))
            .ok_or(MissingImage::NoInlineData)
    }
}

/// Error body returned by the upstream on non-success statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl UpstreamErrorBody {
    /// `error.message` from a raw error body, if present and non-empty
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<UpstreamErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
    }
}
