pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{
    Config, StorageConfig, ValidationResult, WeatherConfig, API_KEY_ENV, AVAILABLE_CITIES,
    DEFAULT_CITY,
};
pub use error::{AppError, ConfigError};

use anyhow::Result;

/// Initialize logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("SkyTodo core initialized");
    Ok(())
}
