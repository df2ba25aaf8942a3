//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod cars;
pub mod error;
pub mod health;
pub mod payments;
pub mod rentals;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::{ApiResult, json_config};

use actix_web::web;

/// Register every API route and the JSON error handler.
///
/// The caller provides [`state::HttpState`] and [`health::HealthState`] as
/// app data. `/users/me` is registered ahead of `/users/{id}` so it is not
/// parsed as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::ready)
        .service(health::live)
        .service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(cars::list_cars)
        .service(cars::get_car)
        .service(cars::add_car)
        .service(cars::update_car)
        .service(cars::delete_car)
        .service(rentals::create_rental)
        .service(rentals::list_rentals)
        .service(rentals::get_rental)
        .service(rentals::reschedule_rental)
        .service(rentals::delete_rental)
        .service(payments::settle_payment)
        .service(payments::list_payments)
        .service(payments::get_payment)
        .service(payments::update_payment)
        .service(payments::delete_payment);
}
