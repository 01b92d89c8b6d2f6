//! Pool Module
//!
//! Upstream credential pooling.

pub mod key_pool;

pub use key_pool::{discover_keys, ApiKey, KeyPool, KeyPoolStats, DEFAULT_KEY_PREFIX};
