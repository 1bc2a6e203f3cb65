//! Session token minting.
//!
//! Token layout before encoding:
//! - 24 bytes: random nonce from the OS CSPRNG
//! - 16 bytes: keyed BLAKE3 of (domain tag, nonce), truncated
//!
//! Encoded as unpadded URL-safe base64, which makes every token 54 characters
//! and safe to place in a header or a cookie without escaping.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

use crate::key::SecretKey;

/// Nonce length in bytes.
const NONCE_LEN: usize = 24;

/// Truncated MAC length in bytes.
const MAC_LEN: usize = 16;

/// Total decoded token length (nonce followed by MAC).
const TOKEN_BYTES: usize = 40;

/// Length of an encoded token in characters.
pub const TOKEN_LEN: usize = 54;

/// Domain tag mixed into every MAC. Bump the version when the layout changes.
const MAC_DOMAIN: &[u8] = b"lectern.session-token.v1";

/// Mints unpredictable session tokens under a secret key.
#[derive(Debug, Clone)]
pub struct TokenMinter {
    key: SecretKey,
}

impl TokenMinter {
    /// Create a minter using an existing key.
    #[must_use]
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    /// Create a minter with a freshly generated key.
    ///
    /// Tokens minted by a process-local key stop verifying once the process
    /// exits, matching the lifetime of in-memory sessions.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(SecretKey::generate())
    }

    /// Loggable identifier of the minting key.
    #[must_use]
    pub fn key_id(&self) -> String {
        self.key.key_id()
    }

    /// Mint a new token.
    #[must_use]
    pub fn mint(&self) -> String {
        let mut raw = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut raw[..NONCE_LEN]);
        let mac = self.mac(&raw[..NONCE_LEN]);
        raw[NONCE_LEN..].copy_from_slice(&mac[..MAC_LEN]);
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Whether `token` was minted by this minter's key.
    ///
    /// The MAC comparison runs in constant time.
    #[must_use]
    pub fn verify(&self, token: &str) -> bool {
        if token.len() != TOKEN_LEN {
            return false;
        }
        let Ok(raw) = URL_SAFE_NO_PAD.decode(token) else {
            return false;
        };
        if raw.len() != TOKEN_BYTES {
            return false;
        }
        let (nonce, presented) = raw.split_at(NONCE_LEN);
        let expected = self.mac(nonce);
        expected[..MAC_LEN].ct_eq(presented).into()
    }

    fn mac(&self, nonce: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new_keyed(self.key.as_bytes());
        hasher.update(MAC_DOMAIN);
        hasher.update(nonce);
        *hasher.finalize().as_bytes()
    }
}
