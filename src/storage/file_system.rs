//! File system layout for vault persistence
//!
//! Resolves where the ledger database and content store live, and
//! handles reading and writing game files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GlobalConfig;

/// File system errors
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Game file not found: {0}")]
    GameFileNotFound(String),

    #[error("Output file already exists: {0}")]
    OutputExists(String),

    #[error("Data directory not found")]
    DataDirectoryNotFound,
}

/// Get the default data directory path
///
/// Returns: `~/.gamevault/`
pub fn default_data_dir() -> Result<PathBuf, FileSystemError> {
    crate::config::default_config_dir().map_err(|_| FileSystemError::DataDirectoryNotFound)
}

/// Get the data directory (custom or default)
pub fn data_dir(custom_dir: Option<&str>) -> Result<PathBuf, FileSystemError> {
    match custom_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => default_data_dir(),
    }
}

/// Resolved on-disk locations for a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub data_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub content_dir: PathBuf,
}

impl VaultPaths {
    /// Resolve paths from configuration
    ///
    /// Returns:
    /// - ledger: `registry.ledger_path` or `<data_dir>/ledger.db`
    /// - content: `storage.content_dir` or `<data_dir>/content/`
    pub fn resolve(config: &GlobalConfig) -> Result<Self, FileSystemError> {
        let data_dir = data_dir(config.data_dir.as_deref())?;

        let ledger_path = match &config.registry.ledger_path {
            Some(path) => PathBuf::from(path),
            None => data_dir.join("ledger.db"),
        };

        let content_dir = match &config.storage.content_dir {
            Some(dir) => PathBuf::from(dir),
            None => data_dir.join("content"),
        };

        Ok(Self {
            data_dir,
            ledger_path,
            content_dir,
        })
    }
}

/// Read a game file to publish
pub fn read_game_file(path: &Path) -> Result<Vec<u8>, FileSystemError> {
    if !path.is_file() {
        return Err(FileSystemError::GameFileNotFound(path.display().to_string()));
    }
    Ok(fs::read(path)?)
}

/// Write downloaded game content
///
/// Refuses to overwrite an existing file. Creates parent directories.
pub fn write_game_file(path: &Path, data: &[u8]) -> Result<(), FileSystemError> {
    if path.exists() {
        return Err(FileSystemError::OutputExists(path.display().to_string()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, data)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_default_under_data_dir() {
        let mut config = GlobalConfig::default();
        config.data_dir = Some("/srv/vault".to_string());

        let paths = VaultPaths::resolve(&config).unwrap();
        assert_eq!(paths.ledger_path, PathBuf::from("/srv/vault/ledger.db"));
        assert_eq!(paths.content_dir, PathBuf::from("/srv/vault/content"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let mut config = GlobalConfig::default();
        config.data_dir = Some("/srv/vault".to_string());
        config.registry.ledger_path = Some("/var/lib/ledger.db".to_string());
        config.storage.content_dir = Some("/mnt/blobs".to_string());

        let paths = VaultPaths::resolve(&config).unwrap();
        assert_eq!(paths.ledger_path, PathBuf::from("/var/lib/ledger.db"));
        assert_eq!(paths.content_dir, PathBuf::from("/mnt/blobs"));
    }
}
