//! Vault manager - Main integration layer
//!
//! Coordinates between config, the ownership ledger, the content store,
//! and the access layer.

use crate::access::{AccessError, GameAccessService};
use crate::config::{ConfigError, GlobalConfig};
use crate::registry::{GameLedger, RegistryError};
use crate::storage::file_system::{FileSystemError, VaultPaths};
use crate::storage::models::{GameToken, PublishedGame, TransferRecord};
use crate::storage::{ContentStore, ContentStoreError, FsContentStore};
use crate::types::{AccountAddress, TokenId};

/// Errors that can occur in the vault manager
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Content store error: {0}")]
    ContentStore(#[from] ContentStoreError),

    #[error("Token {0} has no sealed locator")]
    NotSealed(TokenId),

    #[error("Cannot transfer token {0} to its current owner")]
    SelfTransfer(TokenId),
}

/// Main vault manager
///
/// Owns the ledger and the content store. Every access decision goes
/// through [`GameAccessService`] with a live ledger lookup.
pub struct VaultManager<S: ContentStore = FsContentStore> {
    ledger: GameLedger,
    store: S,
}

impl VaultManager<FsContentStore> {
    /// Open the ledger and content store described by `config`
    pub fn new(config: &GlobalConfig) -> Result<Self, ManagerError> {
        let paths = VaultPaths::resolve(config)?;

        log::debug!("Data directory: {}", paths.data_dir.display());

        let ledger = GameLedger::open(&paths.ledger_path)?;
        let store = FsContentStore::open(&paths.content_dir, config.storage.verify_on_retrieve)?;

        Ok(Self { ledger, store })
    }
}

impl<S: ContentStore> VaultManager<S> {
    /// Assemble a manager from existing parts
    pub fn from_parts(ledger: GameLedger, store: S) -> Self {
        Self { ledger, store }
    }

    pub fn ledger(&self) -> &GameLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn access(&self) -> GameAccessService<&GameLedger> {
        GameAccessService::new(&self.ledger)
    }

    /// Publish a game: store content, seal the locator, mint the token
    ///
    /// The envelope is sealed for `owner` before the mint and written with
    /// the token row, so a failed mint leaves no unsealed token behind.
    /// Stored content is addressed by its hash and is safe to leave in place.
    ///
    /// # Arguments
    ///
    /// * `owner` - Account receiving the minted token
    /// * `title` - Display title
    /// * `metadata_uri` - Public metadata URI (part of the fingerprint)
    /// * `content` - Game bytes
    pub async fn publish_game(
        &mut self,
        owner: &AccountAddress,
        title: &str,
        metadata_uri: &str,
        content: &[u8],
    ) -> Result<PublishedGame, ManagerError> {
        let locator = self.store.store(content)?;
        let envelope = self
            .access()
            .seal_for_new_holder(metadata_uri, owner, &locator)
            .await?;
        let token = self.ledger.mint_sealed(owner, title, metadata_uri, &envelope)?;

        log::info!("✓ Published '{}' as token #{}", title, token.token_id);

        Ok(PublishedGame {
            token,
            content_size: content.len() as u64,
        })
    }

    fn sealed_locator(&self, token_id: TokenId) -> Result<crate::access::EncryptedEnvelope, ManagerError> {
        self.ledger
            .token(token_id)?
            .encrypted_locator
            .ok_or(ManagerError::NotSealed(token_id))
    }

    /// Decrypt the storage locator of a token for `requester`
    ///
    /// Non-holders are denied before the token's seal state is consulted,
    /// so they cannot tell a sealed token from an unsealed one.
    pub async fn reveal_locator(
        &self,
        token_id: TokenId,
        requester: &AccountAddress,
    ) -> Result<String, ManagerError> {
        if !self.access().validate_access(token_id, requester).await? {
            log::warn!("Access denied for token #{}", token_id);
            return Err(AccessError::AuthenticationFailed.into());
        }

        let envelope = self.sealed_locator(token_id)?;
        Ok(self.access().open_locator(token_id, requester, &envelope).await?)
    }

    /// Download game content as `requester`
    ///
    /// Ownership is verified against the ledger immediately before the
    /// locator is decrypted.
    pub async fn download_game(
        &self,
        token_id: TokenId,
        requester: &AccountAddress,
    ) -> Result<Vec<u8>, ManagerError> {
        let locator = self.reveal_locator(token_id, requester).await?;
        let content = self.store.retrieve(&locator)?;

        log::info!("✓ Downloaded token #{} ({} bytes)", token_id, content.len());

        Ok(content)
    }

    /// Transfer a game to a new owner and re-seal its locator
    ///
    /// The locator is opened as `from` first, which proves both current
    /// ownership and a readable envelope. It is then sealed for `to`, and
    /// the ownership change and new envelope are committed together: if
    /// the write fails, `from` keeps the token and its working envelope.
    pub async fn transfer_game(
        &mut self,
        token_id: TokenId,
        from: &AccountAddress,
        to: &AccountAddress,
    ) -> Result<TransferRecord, ManagerError> {
        if from == to {
            return Err(ManagerError::SelfTransfer(token_id));
        }

        let locator = self.reveal_locator(token_id, from).await?;
        let envelope = self
            .access()
            .seal_for_transfer(token_id, from, to, &locator)
            .await?;
        let record = self.ledger.transfer_sealed(token_id, from, to, &envelope)?;

        log::info!("✓ Re-sealed token #{} for {}", token_id, to);

        Ok(record)
    }

    /// Games currently held by `owner`
    pub fn owned_games(&self, owner: &AccountAddress) -> Result<Vec<GameToken>, ManagerError> {
        Ok(self.ledger.tokens_of_owner(owner)?)
    }

    /// Whether `requester` currently holds `token_id`
    pub async fn has_access(
        &self,
        token_id: TokenId,
        requester: &AccountAddress,
    ) -> Result<bool, ManagerError> {
        Ok(self.access().validate_access(token_id, requester).await?)
    }
}
