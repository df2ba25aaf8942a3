//! Driving port for login and bearer-token authentication.
//!
//! Inbound adapters call it to exchange credentials for a token and to
//! resolve a presented token back to an identity, without knowing which
//! signer or credential store sits behind it.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthenticatedUser, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue an access token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;

    /// Verify a bearer token and return the identity it carries.
    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error>;
}
