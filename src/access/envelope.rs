//! Envelope encryption for storage locators
//!
//! Encrypts a locator under a key derived from an ownership fingerprint:
//! - Stage 1: PBKDF2-HMAC-SHA256 (100,000 iterations, random 128-bit salt)
//!   turns the fingerprint into a key-encryption key
//! - Stage 2: HKDF-SHA256 turns the key-encryption key into the
//!   AES-256-GCM data key
//! - Random 96-bit IV per encryption
//!
//! Envelope layout: base64(salt (16) || iv (12) || ciphertext || tag (16))

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::fingerprint::Fingerprint;
use super::AccessError;

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// AES-GCM initialization vector length in bytes
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Smallest decodable envelope: salt + iv + tag (empty plaintext)
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + IV_LEN + TAG_LEN;

/// PBKDF2 iteration count for the key-encryption key
pub const KDF_ITERATIONS: u32 = 100_000;

/// HKDF info label binding the data key to this envelope format
const DATA_KEY_INFO: &[u8] = b"gamevault/envelope/v1/aes-256-gcm";

/// Intermediate key produced by the password-based stage
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyEncryptionKey([u8; 32]);

/// AES-256-GCM key used to seal the locator
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DataKey([u8; 32]);

/// Base64-encoded encrypted locator
///
/// Persisted on the token record; carries no key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedEnvelope(String);

impl EncryptedEnvelope {
    /// Wrap an encoded envelope (e.g. loaded from storage)
    ///
    /// The contents are validated when decrypting, not here.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EncryptedEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stage 1: derive the key-encryption key from a fingerprint and salt
pub fn derive_key_encryption_key(fingerprint: &Fingerprint, salt: &[u8]) -> KeyEncryptionKey {
    let mut key_bytes = [0u8; 32];
    pbkdf2_hmac::<Sha256>(fingerprint.as_bytes(), salt, KDF_ITERATIONS, &mut key_bytes);
    KeyEncryptionKey(key_bytes)
}

/// Stage 2: derive the AES-256-GCM data key from the key-encryption key
pub fn derive_data_key(kek: &KeyEncryptionKey) -> Result<DataKey, AccessError> {
    let hk = Hkdf::<Sha256>::new(None, &kek.0);
    let mut key_bytes = [0u8; 32];
    hk.expand(DATA_KEY_INFO, &mut key_bytes)
        .map_err(|e| AccessError::Encryption(format!("HKDF expand failed: {}", e)))?;
    Ok(DataKey(key_bytes))
}

fn cipher_for(fingerprint: &Fingerprint, salt: &[u8]) -> Result<Aes256Gcm, AccessError> {
    let kek = derive_key_encryption_key(fingerprint, salt);
    let data_key = derive_data_key(&kek)?;
    let key = aes_gcm::Key::<Aes256Gcm>::from_slice(&data_key.0);
    Ok(Aes256Gcm::new(key))
}

/// Encrypt a locator under a fingerprint
///
/// Fresh salt and IV on every call, so encrypting the same locator twice
/// yields different envelopes.
///
/// # Example
///
/// ```ignore
/// let envelope = encrypt("bafy123", &fingerprint)?;
/// let locator = decrypt(&envelope, &fingerprint)?;
/// ```
pub fn encrypt(plaintext: &str, fingerprint: &Fingerprint) -> Result<EncryptedEnvelope, AccessError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let cipher = cipher_for(fingerprint, &salt)?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| AccessError::Encryption(e.to_string()))?;

    // Combine: salt || iv || ciphertext
    let mut envelope = Vec::with_capacity(SALT_LEN + IV_LEN + ciphertext.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&ciphertext);

    Ok(EncryptedEnvelope(STANDARD.encode(envelope)))
}

/// Decrypt an envelope produced by [`encrypt`]
///
/// # Errors
///
/// - `MalformedEnvelope` if the envelope is not base64 or is too short
/// - `AuthenticationFailed` if the fingerprint differs from the one used
///   to encrypt, or the envelope was altered
pub fn decrypt(envelope: &EncryptedEnvelope, fingerprint: &Fingerprint) -> Result<String, AccessError> {
    let bytes = STANDARD
        .decode(envelope.as_str().trim())
        .map_err(|e| AccessError::MalformedEnvelope(format!("invalid base64: {}", e)))?;

    if bytes.len() < MIN_ENVELOPE_LEN {
        return Err(AccessError::MalformedEnvelope(format!(
            "envelope too short ({} bytes, minimum {})",
            bytes.len(),
            MIN_ENVELOPE_LEN
        )));
    }

    let (salt, rest) = bytes.split_at(SALT_LEN);
    let (iv, ciphertext) = rest.split_at(IV_LEN);

    let cipher = cipher_for(fingerprint, salt)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| AccessError::AuthenticationFailed)?;

    String::from_utf8(plaintext)
        .map_err(|_| AccessError::MalformedEnvelope("plaintext is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::fingerprint::derive_fingerprint;

    #[test]
    fn test_envelope_layout_lengths() {
        let fp = derive_fingerprint(b"ipfs://abc", 1, b"0xabcd");
        let envelope = encrypt("locator", &fp).expect("encrypt");
        let raw = STANDARD.decode(envelope.as_str()).expect("base64");
        assert_eq!(raw.len(), SALT_LEN + IV_LEN + "locator".len() + TAG_LEN);
    }

    #[test]
    fn test_data_key_depends_on_salt() {
        let fp = derive_fingerprint(b"m", 1, b"a");
        let a = derive_data_key(&derive_key_encryption_key(&fp, &[1u8; SALT_LEN])).expect("key");
        let b = derive_data_key(&derive_key_encryption_key(&fp, &[2u8; SALT_LEN])).expect("key");
        assert_ne!(a.0, b.0);
    }
}
