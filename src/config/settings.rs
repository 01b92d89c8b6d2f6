//! Gateway Settings
//!
//! Configuration schema for the gateway. Credentials are not part of it; they
//! come from the environment only (see [`crate::pool::KeyPool::from_env`]).

use crate::pool::DEFAULT_KEY_PREFIX;
use serde::{Deserialize, Serialize};

/// Default upstream endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default image-capable model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Default listen port
pub const DEFAULT_PORT: u16 = 3001;

/// Resolved gateway configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Name prefix of credential environment entries
    pub key_prefix: String,

    /// Upstream endpoint settings
    pub upstream: UpstreamConfig,
}

/// Upstream endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL, without the `/v1beta/...` path
    pub base_url: String,

    /// Model name used in the `generateContent` path
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// `host:port` string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Apply a partial file config on top of this one
    pub fn merge(&mut self, file: FileConfig) {
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(prefix) = file.key_prefix {
            self.key_prefix = prefix;
        }
        if let Some(upstream) = file.upstream {
            if let Some(base_url) = upstream.base_url {
                self.upstream.base_url = base_url;
            }
            if let Some(model) = upstream.model {
                self.upstream.model = model;
            }
        }
    }
}

/// On-disk configuration, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<FileUpstreamConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileUpstreamConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
