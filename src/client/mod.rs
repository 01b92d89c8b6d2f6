//! Client Module
//!
//! Outbound HTTP client for the upstream image API.

pub mod http;

pub use http::{UpstreamClient, API_KEY_HEADER};
