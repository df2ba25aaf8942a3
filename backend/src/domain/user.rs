//! User data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use zeroize::Zeroizing;

use super::UserId;

/// Validation errors returned when constructing user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Full name was blank.
    EmptyFullName,
    /// Email was blank.
    EmptyEmail,
    /// Email is not of the form `local@domain`.
    InvalidEmail,
    /// Phone was blank.
    EmptyPhone,
    /// Password was empty.
    EmptyPassword,
    /// Role string is neither `admin` nor `customer`.
    UnknownRole(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPhone => write!(f, "phone must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::UnknownRole(role) => write!(f, "unknown role: {role}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Human readable name of the account holder, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Trim and reject blank names.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Lower-cased email address used as the login identifier.
///
/// ## Invariants
/// - Exactly one `@` with non-empty local and domain parts.
/// - Stored lower-cased so uniqueness is case-insensitive.
///
/// # Examples
/// ```
/// use carhire::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim, lower-case and check the `local@domain` shape.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let mut parts = trimmed.split('@');
        let valid = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None)
                if !local.is_empty() && !domain.is_empty() && !trimmed.contains(char::is_whitespace)
        );
        if !valid {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Contact phone number. Only presence is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Trim and reject blank numbers.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyPhone);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every resource.
    Admin,
    /// Access to their own account only.
    Customer,
}

impl Role {
    /// Lowercase wire and storage form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Stored password credential (a bcrypt hash). Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed hash.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Plain-text password supplied by a caller, wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Passwords keep caller-provided whitespace; only emptiness is rejected.
    pub fn new(value: &str) -> Result<Self, UserValidationError> {
        if value.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// The plain-text value, for hashing or verification only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Application user.
///
/// Serialises with camelCase keys; the password hash is never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    full_name: FullName,
    email: EmailAddress,
    #[serde(skip)]
    password_hash: PasswordHash,
    phone: PhoneNumber,
    role: Role,
    created_at: DateTime<Utc>,
}

/// Fields required to persist a new or rehydrated [`User`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Stable user identifier.
    pub id: UserId,
    /// Account holder name.
    pub full_name: FullName,
    /// Login email address.
    pub email: EmailAddress,
    /// Stored credential.
    pub password_hash: PasswordHash,
    /// Contact phone number.
    pub phone: PhoneNumber,
    /// Account role.
    pub role: Role,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            email: record.email,
            password_hash: record.password_hash,
            phone: record.phone,
            role: record.role,
            created_at: record.created_at,
        }
    }
}

impl User {
    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Account holder name.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Login email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored credential.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Contact phone number.
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Account role; decides what the holder may access.
    pub fn role(&self) -> Role {
        self.role
    }

    /// When the account was registered.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply profile changes. The role is never changed here.
    pub fn apply(&mut self, changes: UserChanges, password_hash: Option<PasswordHash>) {
        if let Some(full_name) = changes.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
    }
}

/// Validated input for registering a user.
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Account holder name.
    pub full_name: FullName,
    /// Login email; must not already be registered.
    pub email: EmailAddress,
    /// Plain-text password, hashed before storage.
    pub password: Password,
    /// Contact phone number.
    pub phone: PhoneNumber,
}

impl UserDraft {
    /// Validate raw registration fields.
    pub fn try_from_parts(
        full_name: &str,
        email: &str,
        password: &str,
        phone: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            full_name: FullName::new(full_name)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
            phone: PhoneNumber::new(phone)?,
        })
    }
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New account holder name.
    pub full_name: Option<FullName>,
    /// New login email; must stay unique.
    pub email: Option<EmailAddress>,
    /// New contact number.
    pub phone: Option<PhoneNumber>,
    /// New password, rehashed before storage.
    pub password: Option<Password>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_user() -> User {
        User::from(UserRecord {
            id: UserId::random(),
            full_name: FullName::new("Ada Lovelace").expect("name"),
            email: EmailAddress::new("ada@example.com").expect("email"),
            password_hash: PasswordHash::from_hash("$2b$04$hash"),
            phone: PhoneNumber::new("555-0100").expect("phone"),
            role: Role::Customer,
            created_at: Utc::now(),
        })
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("ada", UserValidationError::InvalidEmail)]
    #[case("@example.com", UserValidationError::InvalidEmail)]
    #[case("ada@", UserValidationError::InvalidEmail)]
    #[case("a@b@c", UserValidationError::InvalidEmail)]
    #[case("ada lovelace@example.com", UserValidationError::InvalidEmail)]
    fn rejects_invalid_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[rstest]
    fn draft_trims_and_validates_every_field() {
        let draft = UserDraft::try_from_parts("  Ada  ", "ADA@example.com", " pw ", "123")
            .expect("valid draft");
        assert_eq!(draft.full_name.as_ref(), "Ada");
        assert_eq!(draft.email.as_ref(), "ada@example.com");
        assert_eq!(draft.password.expose(), " pw ");

        let err = UserDraft::try_from_parts("Ada", "ada@example.com", "pw", " ")
            .expect_err("blank phone");
        assert_eq!(err, UserValidationError::EmptyPhone);
    }

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("customer", Role::Customer)]
    fn role_round_trips_through_str(#[case] raw: &str, #[case] role: Role) {
        assert_eq!(raw.parse::<Role>().expect("known role"), role);
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    fn serialisation_omits_password_hash() {
        let value = serde_json::to_value(sample_user()).expect("serialise user");
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert_eq!(value["role"], "customer");
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password").is_none());
    }

    #[rstest]
    fn apply_keeps_role_and_untouched_fields() {
        let mut user = sample_user();
        user.apply(
            UserChanges {
                phone: Some(PhoneNumber::new("555-0199").expect("phone")),
                ..UserChanges::default()
            },
            None,
        );
        assert_eq!(user.phone().as_ref(), "555-0199");
        assert_eq!(user.full_name().as_ref(), "Ada Lovelace");
        assert_eq!(user.role(), Role::Customer);
    }
}
