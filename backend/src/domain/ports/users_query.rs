//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All registered users.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// A single user; `NotFound` when absent.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// Profile of the authenticated caller.
    async fn current_user(&self, authenticated: &UserId) -> Result<User, Error>;
}
