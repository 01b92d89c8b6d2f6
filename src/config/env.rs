//! Environment Access
//!
//! Reads the process environment without panicking on entries that are not
//! valid UTF-8. Such entries are legal on Unix and are skipped.

use std::ffi::OsString;
use tracing::{debug, warn};

/// UTF-8 `(name, value)` pairs of the process environment, in iteration order
pub fn process_env(key_prefix: &str) -> Vec<(String, String)> {
    utf8_vars(std::env::vars_os(), key_prefix)
}

/// Keep the pairs whose name and value are both valid UTF-8.
///
/// A skipped entry whose name looks like a credential entry (starts with
/// `key_prefix`) is reported at `warn` level, anything else at `debug`.
pub fn utf8_vars<I>(vars: I, key_prefix: &str) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (name, _) => {
                let shown = match name {
                    Ok(name) => name,
                    Err(raw) => raw.to_string_lossy().into_owned(),
                };
                if !key_prefix.is_empty() && shown.starts_with(key_prefix) {
                    warn!(variable = %shown, "Ignoring API key entry that is not valid UTF-8");
                } else {
                    debug!(variable = %shown, "Ignoring non UTF-8 environment entry");
                }
                None
            }
        })
        .collect()
}
