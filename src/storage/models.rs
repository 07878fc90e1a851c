//! Storage data models
//!
//! Defines game-related data structures for persistence and user output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::EncryptedEnvelope;
use crate::types::{AccountAddress, TokenId};

/// Game ownership token as recorded in the ledger
///
/// The storage locator is only present in encrypted form, sealed under
/// the current owner's fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameToken {
    /// Token id (assigned sequentially from 1)
    pub token_id: TokenId,

    /// Current owner
    pub owner: AccountAddress,

    /// Display title
    pub title: String,

    /// Metadata URI fixed at mint time (feeds fingerprint derivation)
    pub metadata_uri: String,

    /// Locator envelope (None until sealed, or right after a transfer)
    pub encrypted_locator: Option<EncryptedEnvelope>,

    /// When the token was minted
    pub minted_at: DateTime<Utc>,
}

impl GameToken {
    /// Whether the token carries a sealed locator
    pub fn is_sealed(&self) -> bool {
        self.encrypted_locator.is_some()
    }
}

/// Ownership change recorded by the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub token_id: TokenId,
    pub from: AccountAddress,
    pub to: AccountAddress,
    pub transferred_at: DateTime<Utc>,
}

/// Result of publishing a game (returned to the user, not persisted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedGame {
    /// Minted token
    pub token: GameToken,

    /// Size of the stored content in bytes
    pub content_size: u64,
}
