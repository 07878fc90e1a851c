//! NFT-gated access layer
//!
//! Derives keys from live ownership facts and uses them to seal and open
//! storage locators. Nothing in this module keeps state between calls.

pub mod envelope;
pub mod fingerprint;
pub mod service;

pub use envelope::{decrypt, encrypt, EncryptedEnvelope};
pub use fingerprint::{derive_fingerprint, Fingerprint};
pub use service::GameAccessService;

use crate::registry::RegistryError;

/// Access errors
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Registry query could not be completed
    #[error("Ownership lookup failed: {0}")]
    OwnershipLookupFailed(#[from] RegistryError),

    /// Envelope is not base64 or too short to contain salt, IV and tag
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Wrong owner or tampered envelope (deliberately indistinguishable)
    #[error("Access denied: envelope could not be opened")]
    AuthenticationFailed,

    #[error("Encryption error: {0}")]
    Encryption(String),
}
