//! Config loading and well-known paths.

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::error::RuntimeError;

/// Load configuration from the given path, or the default location.
///
/// A missing file yields the defaults; an unreadable or invalid one is an
/// error.
pub fn load_config(path: Option<&str>) -> Result<Config, RuntimeError> {
    let config_path = match path {
        Some(p) => PathBuf::from(p),
        None => default_config_path(),
    };

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| RuntimeError::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RuntimeError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        info!(path = %config_path.display(), "loaded config");
        Ok(config)
    } else {
        info!("no config file found, using defaults");
        Ok(Config::default())
    }
}

/// Render `config` as TOML.
pub fn render_config(config: &Config) -> Result<String, RuntimeError> {
    toml::to_string_pretty(config)
        .map_err(|e| RuntimeError::Config(format!("failed to serialize config: {e}")))
}

/// Get the default config directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("pixtick")
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}
