//! Ownership fingerprint derivation
//!
//! A fingerprint binds a key to the current on-chain ownership facts of a
//! token: its metadata URI, the ownership proof reported by the registry,
//! and the requesting account.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fingerprint length in bytes (SHA-256 output)
pub const FINGERPRINT_LEN: usize = 32;

/// 256-bit key seed derived from ownership facts
///
/// Never persisted. Recomputed from a live registry lookup for every
/// access request and wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Raw fingerprint bytes
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Fingerprint(<redacted>)")
    }
}

/// Derive the ownership fingerprint for a (token, owner) pair
///
/// Hashes `token_metadata || decimal(ownership_proof) || requester` with
/// SHA-256. Pure function: no configuration, no I/O.
///
/// # Arguments
///
/// * `token_metadata` - Token metadata URI bytes as reported by the registry
/// * `ownership_proof` - Ownership proof value (e.g. 1 if the requester owns the token)
/// * `requester` - Requester address bytes (normalized by the caller)
///
/// # Example
///
/// ```ignore
/// let fp = derive_fingerprint(b"ipfs://abc", 1, b"0xabcd...");
/// ```
pub fn derive_fingerprint(token_metadata: &[u8], ownership_proof: u64, requester: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(token_metadata);
    hasher.update(ownership_proof.to_string().as_bytes());
    hasher.update(requester);

    Fingerprint(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sha256_of_concatenation() {
        let fp = derive_fingerprint(b"ipfs://abc", 1, b"0xabcd");
        let expected: [u8; 32] = Sha256::digest(b"ipfs://abc10xabcd").into();
        assert_eq!(fp.as_bytes(), &expected);
    }

    #[test]
    fn test_debug_does_not_leak_bytes() {
        let fp = derive_fingerprint(b"m", 1, b"a");
        assert_eq!(format!("{:?}", fp), "Fingerprint(<redacted>)");
    }
}
