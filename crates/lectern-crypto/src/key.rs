//! Secret key material with secure memory handling.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, CryptoResult};

/// Length of a secret key in bytes.
const KEY_LEN: usize = 32;

/// Domain used to derive the loggable key id.
const KEY_ID_DOMAIN: &str = "lectern 2025 secret-key id";

/// A 256-bit secret key.
///
/// The key bytes are zeroized on drop. `Debug` shows only the key id.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Generate a new key from the operating system's CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw key bytes (32 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(key))
    }

    /// Create from a hex-encoded key (64 hex characters).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidHexEncoding`] if `s` is not hex, or
    /// [`CryptoError::InvalidKeyLength`] if it does not decode to 32 bytes.
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes = Zeroizing::new(hex::decode(s).map_err(|_| CryptoError::InvalidHexEncoding)?);
        Self::from_bytes(&bytes)
    }

    /// A short identifier for this key, safe to log.
    ///
    /// Derived from a one-way hash, so it reveals nothing about the key.
    #[must_use]
    pub fn key_id(&self) -> String {
        let mut hasher = blake3::Hasher::new_derive_key(KEY_ID_DOMAIN);
        hasher.update(&self.0);
        hex::encode(&hasher.finalize().as_bytes()[..4])
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(id={})", self.key_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_differ() {
        let a = SecretKey::generate();
        let b = SecretKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.key_id(), b.key_id());
    }

    #[test]
    fn test_from_bytes_length_checked() {
        assert!(SecretKey::from_bytes(&[7u8; 32]).is_ok());
        let err = SecretKey::from_bytes(&[7u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        ));
    }

    #[test]
    fn test_from_hex() {
        let key = SecretKey::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(key.as_bytes(), &[0xab; 32]);
        assert!(matches!(
            SecretKey::from_hex("zz"),
            Err(CryptoError::InvalidHexEncoding)
        ));
        assert!(matches!(
            SecretKey::from_hex("abab"),
            Err(CryptoError::InvalidKeyLength { .. })
        ));
    }

    #[test]
    fn test_key_id_is_stable() {
        let key = SecretKey::from_bytes(&[1u8; 32]).unwrap();
        assert_eq!(key.key_id(), key.clone().key_id());
        assert_eq!(key.key_id().len(), 8);
    }

    #[test]
    fn test_debug_hides_key_bytes() {
        let key = SecretKey::from_bytes(&[0xab; 32]).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.starts_with("SecretKey(id="));
        assert!(!debug.contains("abab"));
    }
}
