pub mod config;
pub mod error;

pub use config::{Config, ResolverConfig, TemperatureUnit, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError, LookupError};

use anyhow::Result;

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins; otherwise `default_level` is used. Output goes to stderr
/// so it never interleaves with interactive prompts on stdout.
pub fn init(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::debug!("skycheck core initialized");
    Ok(())
}
