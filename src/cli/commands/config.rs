//! Config command implementations

use crate::config::{load_config, ConfigError, ConfigOverrides, GlobalConfig};
use crate::storage::file_system::{FileSystemError, VaultPaths};

#[derive(Debug, thiserror::Error)]
pub enum ConfigCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),
}

/// Initialize configuration file with defaults
pub fn init() -> Result<(), ConfigError> {
    let config = GlobalConfig::default();

    crate::config::save_config(&config, None)?;

    let config_path = crate::config::default_config_path()?;
    println!("✓ Configuration initialized");
    println!("  Config file: {}", config_path.display());

    Ok(())
}

/// Print the effective configuration after overrides
pub fn show(overrides: ConfigOverrides) -> Result<(), ConfigCommandError> {
    let config = load_config(None, overrides)?;
    let paths = VaultPaths::resolve(&config)?;

    println!("Registry contract:  {}", config.registry.contract_name);
    println!("Data directory:     {}", paths.data_dir.display());
    println!("Ledger database:    {}", paths.ledger_path.display());
    println!("Content directory:  {}", paths.content_dir.display());
    println!("Verify on retrieve: {}", config.storage.verify_on_retrieve);

    Ok(())
}
