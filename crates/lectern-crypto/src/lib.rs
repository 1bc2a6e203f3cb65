//! Lectern Crypto - Key material and session token minting.
//!
//! This crate provides:
//! - [`SecretKey`], 32 bytes of OS randomness that is zeroized on drop
//! - [`TokenMinter`], which mints unpredictable session tokens and can tell
//!   whether a token was minted under its key
//!
//! Tokens are a random nonce followed by a truncated keyed BLAKE3 MAC of that
//! nonce, encoded as unpadded URL-safe base64. They carry no user data.
//!
//! # Example
//!
//! ```
//! use lectern_crypto::TokenMinter;
//!
//! let minter = TokenMinter::generate();
//! let token = minter.mint();
//!
//! assert!(minter.verify(&token));
//! assert_ne!(token, minter.mint());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod key;
mod minter;

pub use error::{CryptoError, CryptoResult};
pub use key::SecretKey;
pub use minter::{TOKEN_LEN, TokenMinter};
