//! Ownership registry layer
//!
//! The registry is the source of truth for who owns which game token.
//! Access decisions query it live; nothing derived from it is cached.

pub mod ledger;

pub use ledger::GameLedger;

use crate::types::{AccountAddress, TokenId};

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),

    #[error("{address} does not own token {token_id}")]
    NotOwner {
        token_id: TokenId,
        address: AccountAddress,
    },

    #[error("Owner index {index} out of bounds for {owner} (balance {balance})")]
    IndexOutOfBounds {
        owner: AccountAddress,
        index: u64,
        balance: u64,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the ownership contract used for access decisions
///
/// Mirrors the two calls the access layer makes into the `GameOwnership`
/// contract. Implementations backed by a remote node perform network I/O,
/// so both calls are async. Retry and timeout policy belongs here, not in
/// the access layer.
#[allow(async_fn_in_trait)]
pub trait OwnershipRegistry {
    /// Metadata URI recorded for a token at mint time
    async fn token_metadata(&self, token_id: TokenId) -> Result<String, RegistryError>;

    /// Ownership proof value for `address` on `token_id`
    ///
    /// Non-zero means the address currently holds the token.
    async fn ownership_proof(
        &self,
        token_id: TokenId,
        address: &AccountAddress,
    ) -> Result<u64, RegistryError>;

    /// Proof value reported for the sole holder of a token
    ///
    /// Lets a locator be sealed for an address before the mint or transfer
    /// that makes it the holder is committed.
    fn holder_proof(&self) -> u64 {
        1
    }
}

impl<T: OwnershipRegistry> OwnershipRegistry for &T {
    async fn token_metadata(&self, token_id: TokenId) -> Result<String, RegistryError> {
        (**self).token_metadata(token_id).await
    }

    async fn ownership_proof(
        &self,
        token_id: TokenId,
        address: &AccountAddress,
    ) -> Result<u64, RegistryError> {
        (**self).ownership_proof(token_id, address).await
    }

    fn holder_proof(&self) -> u64 {
        (**self).holder_proof()
    }
}
