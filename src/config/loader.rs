//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AdminServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Replaces `store.api_key` when set.
pub const STORE_KEY_ENV: &str = "CONFIG_ADMIN_STORE_KEY";
/// Replaces `admin.api_key` when set.
pub const ADMIN_KEY_ENV: &str = "CONFIG_ADMIN_ADMIN_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Secrets may be kept out of the file and supplied through the environment.
pub fn load_config(path: &Path) -> Result<AdminServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: AdminServiceConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Validate a configuration built in code (defaults plus environment).
pub fn finalize_config(mut config: AdminServiceConfig) -> Result<AdminServiceConfig, ConfigError> {
    apply_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply secret overrides looked up through `lookup`. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut AdminServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(STORE_KEY_ENV).filter(|k| !k.is_empty()) {
        config.store.api_key = key;
    }
    if let Some(key) = lookup(ADMIN_KEY_ENV).filter(|k| !k.is_empty()) {
        config.admin.api_key = key;
    }
}
