//! imagegate server entry point
//!
//! ```bash
//! GEMINI_API_KEY_0=... GEMINI_API_KEY_1=... PORT=3001 imagegate
//! ```
//!
//! Exits non-zero before binding when no `GEMINI_API_KEY_*` entry is set.

use anyhow::{Context, Result};
use imagegate::{ConfigLoader, KeyPool};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ConfigLoader::new()
        .context("Failed to load configuration")?
        .into_config();

    let pool = match KeyPool::from_env(&config.key_prefix) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let server = imagegate::build_server(&config, pool).context("Failed to build server")?;

    server
        .run(&config.bind_address())
        .await
        .context("Server terminated with an error")?;

    Ok(())
}
