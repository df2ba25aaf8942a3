//! Port for signing and verifying bearer tokens.
use crate::domain::TokenClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Signing failed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is malformed, has a bad signature or has expired.
        Invalid { message: String } => "token rejected: {message}",
    }
}

/// Issues and verifies signed tokens with a single shared secret.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign the given claims.
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError>;

    /// Verify a token's signature and expiry and return its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
