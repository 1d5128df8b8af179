use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DashboardSettings, DatasetPaths, LoggingSettings, ServerSettings};

/// Environment variables with this prefix override file values,
/// e.g. `RETAIL_SERVER__ADDR=0.0.0.0:8080`.
pub const ENV_PREFIX: &str = "RETAIL";

/// Loads the application configuration.
///
/// Built-in defaults are overlaid by the TOML file at `path` (if it exists) and then
/// by `RETAIL_*` environment variables. The result is validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // The file is optional: every section has defaults.
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}
