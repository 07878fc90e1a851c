//! Content-addressed game content store
//!
//! Stand-in for the external storage network. Content is keyed by the
//! lowercase hex SHA-256 of its bytes; that key is the storage locator
//! sealed on the game token.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Content store errors
#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Content integrity check failed for {locator}: got {actual}")]
    IntegrityMismatch { locator: String, actual: String },
}

/// Storage backend keyed by opaque locators
pub trait ContentStore {
    /// Store bytes and return their locator
    fn store(&self, data: &[u8]) -> Result<String, ContentStoreError>;

    /// Retrieve the bytes behind a locator
    fn retrieve(&self, locator: &str) -> Result<Vec<u8>, ContentStoreError>;

    /// Whether a locator is present
    fn contains(&self, locator: &str) -> Result<bool, ContentStoreError>;
}

/// Locator of `data` (lowercase hex SHA-256)
pub fn content_locator(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// File-system content store (one file per locator)
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
    verify_on_retrieve: bool,
}

impl FsContentStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(root: P, verify_on_retrieve: bool) -> Result<Self, ContentStoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            verify_on_retrieve,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, locator: &str) -> Result<PathBuf, ContentStoreError> {
        let valid = locator.len() == 64
            && locator
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !valid {
            return Err(ContentStoreError::InvalidLocator(locator.to_string()));
        }
        Ok(self.root.join(locator))
    }
}

impl ContentStore for FsContentStore {
    fn store(&self, data: &[u8]) -> Result<String, ContentStoreError> {
        let locator = content_locator(data);
        let path = self.path_for(&locator)?;

        if path.exists() {
            log::debug!("Content already stored ({} bytes)", data.len());
            return Ok(locator);
        }

        // Write-then-rename: readers only ever see complete blobs
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &path)?;

        log::info!("Stored {} bytes of game content", data.len());

        Ok(locator)
    }

    fn retrieve(&self, locator: &str) -> Result<Vec<u8>, ContentStoreError> {
        let path = self.path_for(locator)?;
        if !path.exists() {
            return Err(ContentStoreError::NotFound(locator.to_string()));
        }

        let data = fs::read(&path)?;

        if self.verify_on_retrieve {
            let actual = content_locator(&data);
            if actual != locator {
                return Err(ContentStoreError::IntegrityMismatch {
                    locator: locator.to_string(),
                    actual,
                });
            }
        }

        Ok(data)
    }

    fn contains(&self, locator: &str) -> Result<bool, ContentStoreError> {
        Ok(self.path_for(locator)?.exists())
    }
}
