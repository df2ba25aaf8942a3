//! Account services: registration, login, token authentication and user CRUD.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, TokenIssuer, UserRepository,
    UserRepositoryError, UsersCommand, UsersQuery,
};
use crate::domain::{
    AccessToken, AuthenticatedUser, EmailAddress, Error, FullName, LoginCredentials, Password,
    PhoneNumber, Role, TokenClaims, User, UserChanges, UserDraft, UserId, UserRecord,
};

/// Full name given to the bootstrap administrator.
pub const ADMIN_FULL_NAME: &str = "Admin Default";
/// Phone number given to the bootstrap administrator.
pub const ADMIN_PHONE: &str = "1234567890";

const INVALID_LOGIN: &str = "invalid email or password";

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
        UserRepositoryError::Referenced { .. } => {
            Error::conflict("user still has rentals").with_details(json!({ "code": "user_has_rentals" }))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// Account service implementing the login and user driving ports.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create a new account service.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use carhire::domain::AccountService;
    /// # use carhire::outbound::memory::InMemoryStore;
    /// # use carhire::outbound::security::{BcryptPasswordHasher, JwtTokenIssuer};
    /// let store = Arc::new(InMemoryStore::default());
    /// let service = AccountService::new(
    ///     store,
    ///     Arc::new(BcryptPasswordHasher::new(4)),
    ///     Arc::new(JwtTokenIssuer::new("0123456789abcdef0123456789abcdef")),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn create_with_role(&self, draft: UserDraft, role: Role) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(&draft.password)
            .await
            .map_err(map_hasher_error)?;
        let user = User::from(UserRecord {
            id: UserId::random(),
            full_name: draft.full_name,
            email: draft.email,
            password_hash,
            phone: draft.phone,
            role,
            created_at: self.clock.utc(),
        });
        self.users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), role = %role, "user created");
        Ok(user)
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    /// Create the bootstrap administrator unless an account already uses
    /// `email`. Returns the created user, or `None` when nothing changed.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<Option<User>, Error> {
        let email = EmailAddress::new(email)
            .map_err(|err| Error::invalid_request(format!("admin email: {err}")))?;
        let password = Password::new(password)
            .map_err(|err| Error::invalid_request(format!("admin password: {err}")))?;

        let existing = self
            .users
            .find_by_email(email.as_ref())
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            debug!(email = %email, "admin account already present");
            return Ok(None);
        }

        let draft = UserDraft {
            full_name: FullName::new(ADMIN_FULL_NAME)
                .map_err(|err| Error::internal(format!("invalid admin name: {err}")))?,
            email,
            password,
            phone: PhoneNumber::new(ADMIN_PHONE)
                .map_err(|err| Error::internal(format!("invalid admin phone: {err}")))?,
        };
        self.create_with_role(draft, Role::Admin).await.map(Some)
    }
}

#[async_trait]
impl<U, H, T> LoginService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(Error::unauthorized(INVALID_LOGIN));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_LOGIN));
        }

        let claims = TokenClaims::new(user.id(), user.role(), self.clock.utc());
        let token = self
            .tokens
            .issue(&claims)
            .map_err(|err| Error::internal(err.to_string()))?;
        info!(user_id = %user.id(), "login succeeded");
        Ok(AccessToken {
            token,
            role: user.role(),
        })
    }

    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        self.tokens
            .verify(token)
            .map(AuthenticatedUser::from)
            .map_err(|err| {
                debug!(error = %err, "bearer token rejected");
                Error::unauthorized("invalid or expired token")
            })
    }
}

#[async_trait]
impl<U, H, T> UsersQuery for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_repository_error)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.load(id).await
    }

    async fn current_user(&self, authenticated: &UserId) -> Result<User, Error> {
        self.load(authenticated).await
    }
}

#[async_trait]
impl<U, H, T> UsersCommand for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn register(&self, draft: UserDraft) -> Result<User, Error> {
        self.create_with_role(draft, Role::Customer).await
    }

    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        self.create_with_role(draft, Role::Customer).await
    }

    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let mut user = self.load(id).await?;
        let password_hash = match changes.password.as_ref() {
            Some(password) => Some(self.hasher.hash(password).await.map_err(map_hasher_error)?),
            None => None,
        };
        user.apply(changes, password_hash);

        let updated = self
            .users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;
        if !updated {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(map_user_repository_error)?;
        if !deleted {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
