//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenIssuer`]) are
//! implemented by outbound adapters. Driving ports (`*Query`, `*Command`,
//! [`LoginService`]) are implemented by domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod car_repository;
mod cars_command;
mod cars_query;
mod login_service;
mod password_hasher;
mod payment_command;
mod payment_query;
mod payment_repository;
mod rental_command;
mod rental_query;
mod rental_repository;
mod token_issuer;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use car_repository::MockCarRepository;
pub use car_repository::{CarRepository, CarRepositoryError};
#[cfg(test)]
pub use cars_command::MockCarsCommand;
pub use cars_command::CarsCommand;
#[cfg(test)]
pub use cars_query::MockCarsQuery;
pub use cars_query::CarsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use payment_command::MockPaymentCommand;
pub use payment_command::{PaymentCommand, SettlePaymentRequest};
#[cfg(test)]
pub use payment_query::MockPaymentQuery;
pub use payment_query::PaymentQuery;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use rental_command::MockRentalCommand;
pub use rental_command::{CreateRentalRequest, RentalCommand, RescheduleRentalRequest};
#[cfg(test)]
pub use rental_query::MockRentalQuery;
pub use rental_query::RentalQuery;
#[cfg(test)]
pub use rental_repository::MockRentalRepository;
pub use rental_repository::{RentalRepository, RentalRepositoryError};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
