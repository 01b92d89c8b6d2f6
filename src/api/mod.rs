//! API Module
//!
//! Client-facing bodies and upstream wire types.

pub mod generate;
pub mod upstream;

pub use generate::{ErrorResponse, GenerateRequest, GenerateResponse, HealthResponse};
pub use upstream::{
    Candidate, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData,
    MissingImage, RequestContent, RequestPart, ResponseContent, ResponsePart, UpstreamErrorBody,
    UpstreamErrorDetail,
};
