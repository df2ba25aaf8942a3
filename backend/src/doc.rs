//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the bearer-token security scheme.
//! Swagger UI serves it in debug builds.

use crate::inbound::http::schemas::{
    AccessTokenSchema, CarSchema, ErrorCodeSchema, ErrorSchema, PaymentSchema, RentalSchema,
    UserSchema,
};
use crate::inbound::http::{cars, payments, rentals, users};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the JWT bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /login, valid for 72 hours."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Car hire backend API",
        description = "Accounts, fleet, rentals and payment settlement."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        users::register,
        users::login,
        users::list_users,
        users::current_user,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        cars::list_cars,
        cars::get_car,
        cars::add_car,
        cars::update_car,
        cars::delete_car,
        rentals::create_rental,
        rentals::list_rentals,
        rentals::get_rental,
        rentals::reschedule_rental,
        rentals::delete_rental,
        payments::settle_payment,
        payments::list_payments,
        payments::get_payment,
        payments::update_payment,
        payments::delete_payment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        AccessTokenSchema,
        CarSchema,
        RentalSchema,
        PaymentSchema,
        users::RegisterRequest,
        users::LoginRequest,
        users::UpdateUserRequest,
        cars::CarRequest,
        cars::UpdateCarRequest,
        rentals::RentalRequest,
        rentals::RescheduleRequest,
        payments::SettlePaymentBody,
        payments::UpdatePaymentBody,
    )),
    tags(
        (name = "users", description = "Registration, login and accounts"),
        (name = "cars", description = "Fleet management"),
        (name = "rentals", description = "Bookings and pricing"),
        (name = "payments", description = "Payment settlement"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
