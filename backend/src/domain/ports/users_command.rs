//! Driving port for account registration and maintenance.

use async_trait::async_trait;

use crate::domain::{Error, User, UserChanges, UserDraft, UserId};

/// Domain use-case port for changing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Self-service registration. The role is always `customer`.
    async fn register(&self, draft: UserDraft) -> Result<User, Error>;

    /// Create an account on behalf of someone else; same rules as `register`.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Apply a partial update; a changed email must stay unique.
    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Remove an account that no rental references.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
