//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lectern_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Keys and minting
pub use crate::{SecretKey, TokenMinter};
