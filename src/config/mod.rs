//! Configuration Module
//!
//! Handles gateway configuration loading.

pub mod env;
pub mod loader;
pub mod settings;

pub use env::{process_env, utf8_vars};
pub use loader::{ConfigLoader, CONFIG_PATH_ENV};
pub use settings::{
    FileConfig, FileUpstreamConfig, GatewayConfig, UpstreamConfig, DEFAULT_BASE_URL,
    DEFAULT_MODEL, DEFAULT_PORT,
};
