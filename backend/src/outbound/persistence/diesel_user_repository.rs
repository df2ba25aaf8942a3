//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The unique index on `users.email` surfaces as `DuplicateEmail`; the
//! foreign key from `rentals.user_id` surfaces as `Referenced` on delete.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, FullName, PasswordHash, PhoneNumber, User, UserId, UserRecord};

use super::diesel_basic_error_mapping::{
    Violation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Build a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Map a write failure, lifting the email unique index into `DuplicateEmail`.
fn map_write_error(error: diesel::result::Error, user: &User) -> UserRepositoryError {
    match constraint_violation(&error) {
        Some(Violation::Unique) => UserRepositoryError::duplicate_email(user.email().as_ref()),
        _ => map_diesel_error(error),
    }
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserRepositoryError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    Ok(User::from(UserRecord {
        id: UserId::from_uuid(row.id),
        full_name: FullName::new(&row.full_name).map_err(invalid)?,
        email: EmailAddress::new(&row.email).map_err(invalid)?,
        password_hash: PasswordHash::from_hash(row.password_hash.as_str()),
        phone: PhoneNumber::new(&row.phone).map_err(invalid)?,
        role: row.role.parse().map_err(invalid)?,
        created_at: row.created_at,
    }))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            full_name: user.full_name().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().as_str(),
            phone: user.phone().as_ref(),
            role: user.role().as_str(),
            created_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, user))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            full_name: user.full_name().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().as_str(),
            phone: user.phone().as_ref(),
        };

        diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(|err| map_write_error(err, user))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(|err| match constraint_violation(&err) {
                Some(Violation::ForeignKey) => {
                    UserRepositoryError::referenced(format!("user {id} has rentals"))
                }
                _ => map_diesel_error(err),
            })
    }
}
