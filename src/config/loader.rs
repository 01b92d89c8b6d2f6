//! Configuration Loader
//!
//! Builds a [`GatewayConfig`] from defaults, an optional JSON file and
//! environment overrides, in that order.

use crate::config::env::process_env;
use crate::config::settings::{FileConfig, GatewayConfig};
use crate::error::{GatewayError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable pointing at a config file
pub const CONFIG_PATH_ENV: &str = "IMAGEGATE_CONFIG";

/// Configuration loader with support for multiple sources
pub struct ConfigLoader {
    config: GatewayConfig,
}

impl ConfigLoader {
    /// Load from default file locations and the process environment
    pub fn new() -> Result<Self> {
        let mut loader = Self {
            config: GatewayConfig::default(),
        };

        loader.load_from_default_paths()?;
        let vars = process_env(&loader.config.key_prefix);
        loader.apply_env_vars(vars)?;

        Ok(loader)
    }

    /// Defaults only, no file and no environment
    pub fn defaults() -> Self {
        Self {
            config: GatewayConfig::default(),
        }
    }

    /// Load the first config file that exists
    fn load_from_default_paths(&mut self) -> Result<()> {
        if let Some(path) = Self::get_config_paths().into_iter().find(|p| p.exists()) {
            self.load_from_file(&path)?;
        }

        Ok(())
    }

    /// Get list of config paths to check, highest priority first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(custom_path));
        }

        paths.push(PathBuf::from("imagegate.json"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("imagegate").join("config.json"));
        }

        paths
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file: FileConfig = serde_json::from_str(&content).map_err(|e| {
            GatewayError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loaded config file");
        self.config.merge(file);
        Ok(())
    }

    /// Apply environment overrides from `(name, value)` pairs
    pub fn apply_env_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            match name.as_str() {
                "HOST" => self.config.host = value,
                "PORT" => {
                    self.config.port = value.parse().map_err(|_| {
                        GatewayError::Config(format!("PORT must be a port number, got '{}'", value))
                    })?;
                }
                "GEMINI_API_BASE" => self.config.upstream.base_url = value,
                "GEMINI_MODEL" => self.config.upstream.model = value,
                "IMAGEGATE_KEY_PREFIX" => {
                    if value.is_empty() {
                        return Err(GatewayError::Config(
                            "IMAGEGATE_KEY_PREFIX must not be empty".to_string(),
                        ));
                    }
                    self.config.key_prefix = value;
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Take ownership of the configuration
    pub fn into_config(self) -> GatewayConfig {
        self.config
    }
}
