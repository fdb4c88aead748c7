use crate::core::{FlashError, Result};
use crate::flatten::PARAMETER_SIGIL;
use crate::table::{ITEM_COLUMN, TEXT_MAX_LENGTH};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub binding: BindingConfig,
}

/// Settings for parameter naming and structured parameter projection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Marker prepended to flattened member names
    pub parameter_sigil: String,
    /// Column name of item-valued projections
    pub item_column: String,
    /// Declared length of text item columns; `None` leaves it unbounded
    pub text_max_length: Option<usize>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        BindingConfig {
            parameter_sigil: PARAMETER_SIGIL.to_string(),
            item_column: ITEM_COLUMN.to_string(),
            text_max_length: Some(TEXT_MAX_LENGTH),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = flashbind::config::load_config("flashbind.toml").expect("Failed to load config");
/// println!("{:?}", config.binding);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).map_err(|e| FlashError::Config(e.to_string()))?;
    if config.binding.item_column.is_empty() {
        return Err(FlashError::Config("item_column must not be empty".to_string()));
    }
    Ok(config)
}

/// `<config dir>/flashbind/config.toml` for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flashbind").join("config.toml"))
}
