//! Where fresh session tokens come from.

use lectern_core::{AccessResult, Token};
use lectern_crypto::TokenMinter;

/// A generator of candidate session tokens.
///
/// The store may draw more than once per issuance if a candidate collides
/// with a live session, so implementations must not assume every draw is
/// used.
pub trait TokenSource: Send + Sync {
    /// Draw the next candidate token.
    ///
    /// # Errors
    ///
    /// Returns an error if the source produced an unusable value.
    fn draw(&self) -> AccessResult<Token>;
}

/// The production token source: keyed-MAC tokens from a [`TokenMinter`].
#[derive(Debug, Clone)]
pub struct MintedTokens {
    minter: TokenMinter,
}

impl MintedTokens {
    /// Wrap an existing minter.
    #[must_use]
    pub fn new(minter: TokenMinter) -> Self {
        Self { minter }
    }

    /// A source backed by a freshly generated, process-local key.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(TokenMinter::generate())
    }

    /// The underlying minter, e.g. to check whether a token is one of ours.
    #[must_use]
    pub fn minter(&self) -> &TokenMinter {
        &self.minter
    }
}

impl Default for MintedTokens {
    fn default() -> Self {
        Self::generate()
    }
}

impl TokenSource for MintedTokens {
    fn draw(&self) -> AccessResult<Token> {
        Token::new(self.minter.mint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_tokens_verify() {
        let source = MintedTokens::generate();
        let token = source.draw().unwrap();
        assert!(source.minter().verify(token.value()));
    }

    #[test]
    fn test_consecutive_draws_differ() {
        let source = MintedTokens::generate();
        assert_ne!(source.draw().unwrap(), source.draw().unwrap());
    }
}
