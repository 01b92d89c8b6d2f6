//! API Key Pool
//!
//! Holds the upstream credentials loaded at startup and hands them out in
//! strict round-robin order.

use crate::config::process_env;
use crate::error::{GatewayError, Result};
use reqwest::header::HeaderValue;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::warn;

/// Default prefix for credential environment entries (`GEMINI_API_KEY_0`, ...)
pub const DEFAULT_KEY_PREFIX: &str = "GEMINI_API_KEY_";

/// A single upstream API key with usage tracking
pub struct ApiKey {
    /// Position in the pool (rotation order)
    index: usize,

    /// The actual API key value
    value: String,

    /// Number of times this key has been leased
    lease_count: AtomicU64,
}

impl ApiKey {
    fn new(index: usize, value: String) -> Self {
        Self {
            index,
            value,
            lease_count: AtomicU64::new(0),
        }
    }

    /// Position of this key in rotation order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the key value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Number of times this key has been leased
    pub fn lease_count(&self) -> u64 {
        self.lease_count.load(Ordering::Relaxed)
    }
}

// Never print the credential itself.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("index", &self.index)
            .field("value", &"<redacted>")
            .field("lease_count", &self.lease_count())
            .finish()
    }
}

/// Ordered, fixed set of API keys with a shared rotation cursor
#[derive(Debug)]
pub struct KeyPool {
    /// Keys in rotation order, never empty
    keys: Vec<ApiKey>,

    /// Index of the next key to lease, always in `[0, keys.len())`
    cursor: AtomicUsize,
}

impl KeyPool {
    /// Create a pool from raw key values.
    ///
    /// Fails when `keys` is empty or a key cannot be sent as a header value.
    pub fn new(keys: Vec<String>) -> Result<Self> {
        if keys.is_empty() {
            return Err(GatewayError::Config(
                "No API keys configured. Set GEMINI_API_KEY_0, GEMINI_API_KEY_1, ...".to_string(),
            ));
        }

        for (index, key) in keys.iter().enumerate() {
            if HeaderValue::from_str(key).is_err() {
                return Err(GatewayError::Config(format!(
                    "API key at index {} contains characters not allowed in an HTTP header",
                    index
                )));
            }
        }

        Ok(Self {
            keys: keys
                .into_iter()
                .enumerate()
                .map(|(index, value)| ApiKey::new(index, value))
                .collect(),
            cursor: AtomicUsize::new(0),
        })
    }

    /// Build a pool from the entries whose name starts with `prefix`.
    ///
    /// Entries keep their iteration order; empty values are skipped. An
    /// empty prefix would match every variable and is rejected.
    pub fn from_env_vars<I>(prefix: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if prefix.is_empty() {
            return Err(GatewayError::Config(
                "API key prefix must not be empty".to_string(),
            ));
        }
        Self::new(discover_keys(prefix, vars))
    }

    /// Build a pool from the process environment, skipping non UTF-8 entries
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::from_env_vars(prefix, process_env(prefix))
    }

    /// Get the number of keys in the pool
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: an empty pool cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Lease the key under the cursor and advance the cursor by one, wrapping.
    ///
    /// Read and advance happen in one atomic step, so concurrent callers each
    /// get a distinct position in the rotation.
    pub fn lease_next(&self) -> &ApiKey {
        let len = self.keys.len();
        let idx = match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
        {
            Ok(previous) | Err(previous) => previous,
        };

        let key = &self.keys[idx];
        key.lease_count.fetch_add(1, Ordering::Relaxed);
        key
    }

    /// Get statistics about the pool
    pub fn stats(&self) -> KeyPoolStats {
        KeyPoolStats {
            total_keys: self.keys.len(),
            total_leases: self.keys.iter().map(|k| k.lease_count()).sum(),
        }
    }
}

/// Collect credential values from `(name, value)` pairs matching `prefix`
pub fn discover_keys<I>(prefix: &str, vars: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(name, _)| name.starts_with(prefix))
        .filter_map(|(name, value)| {
            if value.is_empty() {
                warn!(variable = %name, "Ignoring empty API key entry");
                None
            } else {
                Some(value)
            }
        })
        .collect()
}

/// Statistics about a key pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPoolStats {
    pub total_keys: usize,
    pub total_leases: u64,
}
