//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// The user is still referenced by rentals.
        Referenced { message: String } => "user is still referenced: {message}",
    }
}

/// Record store for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with `DuplicateEmail` on a taken email.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by (lower-cased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// All users in creation order.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Overwrite a stored user. Returns `false` when the id is unknown.
    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError>;

    /// Remove a user. Returns `false` when the id is unknown.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}
