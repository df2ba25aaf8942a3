//! Port for one-way password hashing.
use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification failed inside the adapter.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes and verifies account passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for storage.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a candidate password against a stored hash.
    async fn verify(&self, candidate: &str, hash: &PasswordHash)
    -> Result<bool, PasswordHasherError>;
}
