//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, plus the services that implement the driving ports. Types are
//! immutable outside their documented transitions; invariants and
//! serialisation contracts (serde) live in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Car, Rental, Payment: the aggregates.
//! - Money / DailyRate and [`compute_total`]: exact pricing.
//! - Services: [`AccountService`], [`CarService`], [`RentalService`],
//!   [`SettlementService`].

pub mod account_service;
pub mod auth;
pub mod car;
pub mod car_service;
pub mod error;
pub mod ids;
pub mod money;
pub mod payment;
pub mod ports;
pub mod pricing;
pub mod rental;
pub mod rental_service;
pub mod settlement_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{ADMIN_FULL_NAME, ADMIN_PHONE, AccountService};
pub use self::auth::{
    AccessToken, AuthenticatedUser, LoginCredentials, LoginValidationError, TOKEN_TTL_HOURS,
    TokenClaims,
};
pub use self::car::{
    Car, CarChanges, CarDraft, CarStatus, CarValidationError, MAX_CAR_YEAR, MIN_CAR_YEAR,
    RawCarChanges,
};
pub use self::car_service::CarService;
pub use self::error::{DomainError, Error, ErrorCode};
pub use self::ids::{CarId, IdParseError, PaymentId, RentalId, UserId};
pub use self::money::{DailyRate, Money, MoneyError};
pub use self::payment::{Payment, PaymentMethod, PaymentMethodError, PaymentRecord};
pub use self::pricing::{PricingError, RentalPeriod, SECONDS_PER_DAY, compute_total};
pub use self::rental::{LifecycleError, PaymentStatus, Rental, RentalStatus, UnknownStatus};
pub use self::rental_service::RentalService;
pub use self::settlement_service::SettlementService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, FullName, Password, PasswordHash, PhoneNumber, Role, User, UserChanges,
    UserDraft, UserRecord, UserValidationError,
};
