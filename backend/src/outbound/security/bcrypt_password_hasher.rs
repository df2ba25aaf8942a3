//! bcrypt adapter for the `PasswordHasher` port.
//!
//! Hashing and verification run on the blocking thread pool, never on an
//! actix worker.

use async_trait::async_trait;
use tokio::task;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

/// Password hasher using bcrypt with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn join_error(error: task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hashing(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let plain = zeroize::Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(plain.as_str(), cost))
            .await
            .map_err(join_error)?
            .map(PasswordHash::from_hash)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }

    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let candidate = zeroize::Zeroizing::new(candidate.to_owned());
        let stored = hash.as_str().to_owned();
        task::spawn_blocking(move || bcrypt::verify(candidate.as_str(), &stored))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }
}
