//! Game access service
//!
//! Combines live registry lookups with fingerprint derivation and envelope
//! encryption. Ownership is re-read from the registry on every call; a
//! proof value is never cached between requests.
//!
//! Key derivation runs 100,000 PBKDF2 rounds, so encryption and decryption
//! are moved onto tokio's blocking pool instead of running on the task that
//! awaits them.

use super::envelope::{self, EncryptedEnvelope};
use super::fingerprint::{derive_fingerprint, Fingerprint};
use super::AccessError;
use crate::registry::OwnershipRegistry;
use crate::types::{AccountAddress, TokenId};

/// Seals and opens storage locators for game token holders
///
/// # Example
///
/// ```ignore
/// let service = GameAccessService::new(&ledger);
/// let envelope = service.seal_locator(token_id, &owner, "bafy123").await?;
/// let locator = service.open_locator(token_id, &owner, &envelope).await?;
/// ```
pub struct GameAccessService<R> {
    registry: R,
}

impl<R: OwnershipRegistry> GameAccessService<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Live ownership proof for `requester` on `token_id`
    async fn live_proof(
        &self,
        token_id: TokenId,
        requester: &AccountAddress,
    ) -> Result<(String, u64), AccessError> {
        let metadata = self.registry.token_metadata(token_id).await?;
        let proof = self.registry.ownership_proof(token_id, requester).await?;
        Ok((metadata, proof))
    }

    /// Derive the fingerprint for `requester` from current registry state
    pub async fn fingerprint_for(
        &self,
        token_id: TokenId,
        requester: &AccountAddress,
    ) -> Result<Fingerprint, AccessError> {
        let (metadata, proof) = self.live_proof(token_id, requester).await?;
        Ok(derive_fingerprint(metadata.as_bytes(), proof, requester.as_bytes()))
    }

    /// Whether `requester` currently holds `token_id`
    pub async fn validate_access(
        &self,
        token_id: TokenId,
        requester: &AccountAddress,
    ) -> Result<bool, AccessError> {
        let proof = self.registry.ownership_proof(token_id, requester).await?;
        Ok(proof > 0)
    }

    /// Encrypt `locator` for the current owner of `token_id`
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` if `owner` does not currently hold the token.
    pub async fn seal_locator(
        &self,
        token_id: TokenId,
        owner: &AccountAddress,
        locator: &str,
    ) -> Result<EncryptedEnvelope, AccessError> {
        let (metadata, proof) = self.live_proof(token_id, owner).await?;
        if proof == 0 {
            log::warn!("Refusing to seal token #{}: requester is not the owner", token_id);
            return Err(AccessError::AuthenticationFailed);
        }

        let fingerprint = derive_fingerprint(metadata.as_bytes(), proof, owner.as_bytes());
        let sealed = encrypt_blocking(locator, fingerprint).await?;

        log::debug!("Sealed locator for token #{}", token_id);

        Ok(sealed)
    }

    /// Encrypt `locator` for the holder a not yet minted token will have
    ///
    /// The fingerprint uses the proof value the registry reports for a sole
    /// holder, so the envelope opens once the mint is recorded.
    pub async fn seal_for_new_holder(
        &self,
        metadata_uri: &str,
        holder: &AccountAddress,
        locator: &str,
    ) -> Result<EncryptedEnvelope, AccessError> {
        let proof = self.registry.holder_proof();
        let fingerprint = derive_fingerprint(metadata_uri.as_bytes(), proof, holder.as_bytes());
        encrypt_blocking(locator, fingerprint).await
    }

    /// Encrypt `locator` for `to` ahead of a transfer of `token_id`
    ///
    /// `from` must currently hold the token. The envelope is sealed with
    /// the proof `to` will have once the transfer is recorded, so it can be
    /// committed in the same write as the ownership change.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` if `from` does not currently hold the token.
    pub async fn seal_for_transfer(
        &self,
        token_id: TokenId,
        from: &AccountAddress,
        to: &AccountAddress,
        locator: &str,
    ) -> Result<EncryptedEnvelope, AccessError> {
        let (metadata, proof) = self.live_proof(token_id, from).await?;
        if proof == 0 {
            log::warn!("Refusing to re-seal token #{}: sender is not the owner", token_id);
            return Err(AccessError::AuthenticationFailed);
        }

        let fingerprint =
            derive_fingerprint(metadata.as_bytes(), self.registry.holder_proof(), to.as_bytes());
        let sealed = encrypt_blocking(locator, fingerprint).await?;

        log::debug!("Re-sealed locator for token #{} ahead of transfer", token_id);

        Ok(sealed)
    }

    /// Decrypt the locator of `token_id` for `requester`
    ///
    /// The fingerprint is re-derived from a fresh registry lookup right
    /// before decryption, so a previous owner loses access as soon as the
    /// transfer is recorded.
    pub async fn open_locator(
        &self,
        token_id: TokenId,
        requester: &AccountAddress,
        sealed: &EncryptedEnvelope,
    ) -> Result<String, AccessError> {
        let (metadata, proof) = self.live_proof(token_id, requester).await?;
        if proof == 0 {
            log::warn!("Access denied for token #{}", token_id);
            return Err(AccessError::AuthenticationFailed);
        }

        let fingerprint = derive_fingerprint(metadata.as_bytes(), proof, requester.as_bytes());
        let locator = decrypt_blocking(sealed, fingerprint).await.map_err(|e| {
            log::warn!("Failed to open locator for token #{}: {}", token_id, e);
            e
        })?;

        log::debug!("Opened locator for token #{}", token_id);

        Ok(locator)
    }
}

async fn encrypt_blocking(
    locator: &str,
    fingerprint: Fingerprint,
) -> Result<EncryptedEnvelope, AccessError> {
    let locator = locator.to_string();
    tokio::task::spawn_blocking(move || envelope::encrypt(&locator, &fingerprint))
        .await
        .map_err(|e| AccessError::Encryption(format!("Encryption task failed: {}", e)))?
}

async fn decrypt_blocking(
    sealed: &EncryptedEnvelope,
    fingerprint: Fingerprint,
) -> Result<String, AccessError> {
    let sealed = sealed.clone();
    tokio::task::spawn_blocking(move || envelope::decrypt(&sealed, &fingerprint))
        .await
        .map_err(|e| AccessError::Encryption(format!("Decryption task failed: {}", e)))?
}
