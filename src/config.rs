//! Configuration types for gamevault
//!
//! Manages global configuration: data directory, ownership ledger, and
//! content store settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global vault configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub registry: RegistryConfig,
    pub storage: StorageConfig,
    /// Optional custom data directory (ledger and content live here by default)
    pub data_dir: Option<String>,
}

/// Ownership registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Name of the ownership contract the ledger stands in for
    pub contract_name: String,
    /// Optional custom ledger database path (default: `<data_dir>/ledger.db`)
    pub ledger_path: Option<String>,
}

/// Content store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Optional custom content directory (default: `<data_dir>/content`)
    pub content_dir: Option<String>,
    /// Re-hash content on retrieval and reject mismatches
    pub verify_on_retrieve: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig {
                contract_name: "GameOwnership".to_string(),
                ledger_path: None,
            },
            storage: StorageConfig {
                content_dir: None,
                verify_on_retrieve: true,
            },
            data_dir: None,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config directory not found")]
    DirectoryNotFound,
}

/// Configuration overrides from CLI arguments or environment variables
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub data_dir: Option<String>,
    pub ledger_path: Option<String>,
    pub content_dir: Option<String>,
}

impl ConfigOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Create overrides from environment variables
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("GAMEVAULT_DATA_DIR").ok(),
            ledger_path: std::env::var("GAMEVAULT_LEDGER_PATH").ok(),
            content_dir: std::env::var("GAMEVAULT_CONTENT_DIR").ok(),
        }
    }

    /// Merge with another set of overrides (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.ledger_path.is_some() {
            self.ledger_path = other.ledger_path;
        }
        if other.content_dir.is_some() {
            self.content_dir = other.content_dir;
        }
        self
    }
}

/// Get the default configuration directory path
///
/// Returns: `~/.gamevault/`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".gamevault"))
        .ok_or(ConfigError::DirectoryNotFound)
}

/// Get the default configuration file path
///
/// Returns: `~/.gamevault/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_config_dir()?.join("config.json"))
}

/// Load configuration from file with overrides
///
/// # Priority (highest to lowest):
/// 1. CLI overrides (passed as argument)
/// 2. Environment variables
/// 3. Config file
/// 4. Defaults
///
/// # Example
///
/// ```ignore
/// use gamevault::config::{load_config, ConfigOverrides};
///
/// let mut cli_overrides = ConfigOverrides::new();
/// cli_overrides.data_dir = Some("/tmp/vault".to_string());
///
/// let config = load_config(None, cli_overrides)?;
/// ```
pub fn load_config(
    config_path: Option<&Path>,
    cli_overrides: ConfigOverrides,
) -> Result<GlobalConfig, ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents)?
    } else {
        GlobalConfig::default()
    };

    let overrides = ConfigOverrides::from_env().merge(cli_overrides);
    apply_overrides(&mut config, overrides);

    if config.registry.contract_name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "registry.contract_name must not be empty".to_string(),
        ));
    }

    Ok(config)
}

/// Save configuration to file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &GlobalConfig, config_path: Option<&Path>) -> Result<(), ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;

    Ok(())
}

/// Apply configuration overrides (internal helper)
fn apply_overrides(config: &mut GlobalConfig, overrides: ConfigOverrides) {
    if let Some(data_dir) = overrides.data_dir {
        config.data_dir = Some(data_dir);
    }
    if let Some(ledger_path) = overrides.ledger_path {
        config.registry.ledger_path = Some(ledger_path);
    }
    if let Some(content_dir) = overrides.content_dir {
        config.storage.content_dir = Some(content_dir);
    }
}
