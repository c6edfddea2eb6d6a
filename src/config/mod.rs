//! Application configuration loaded from config.toml.
//!
//! The file path comes from `FUND_CONFIG_PATH` (default `config.toml`). A
//! missing file is not an error: the console then runs on the built-in demo
//! seed with default display settings.

/// Clock, toast and timezone settings
pub mod display;

/// Initial profiles and transactions
pub mod seed;

use crate::errors::{Error, Result};
use display::DisplayConfig;
use seed::Seed;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "FUND_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// `[display]` table
    #[serde(default)]
    pub display: DisplayConfig,
    /// `[[profiles]]` and `[[transactions]]` tables
    #[serde(flatten)]
    pub seed: Seed,
}

impl AppConfig {
    /// Configured seed, or the demo roster when none is configured.
    pub fn seed_or_demo(&self) -> Result<Seed> {
        if self.seed.is_empty() {
            info!("No seed configured, using demo roster");
            Ok(Seed::demo(self.display.offset()?))
        } else {
            Ok(self.seed.clone())
        }
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.display.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or a display value is out of range.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `FUND_CONFIG_PATH` or `./config.toml`.
///
/// Falls back to defaults when the file does not exist.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => path,
        Err(std::env::VarError::NotPresent) => DEFAULT_CONFIG_PATH.to_string(),
        Err(e) => return Err(e.into()),
    };
    if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!(path = %path, "Loaded configuration");
        Ok(config)
    } else {
        info!(path = %path, "Configuration file not found, using defaults");
        Ok(AppConfig::default())
    }
}
