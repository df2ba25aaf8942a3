//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with current state, e.g. an already paid rental.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "rental already paid")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as `{"field": "email", "code": "invalid_email"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    full_name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "555-0100")]
    phone: String,
    #[schema(example = "customer")]
    role: String,
    #[schema(example = "2024-01-01T00:00:00Z")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::AccessToken`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AccessToken)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AccessTokenSchema {
    /// HS256 JWT valid for 72 hours.
    token: String,
    #[schema(example = "customer")]
    role: String,
}

/// OpenAPI schema for [`crate::domain::Car`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Car)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CarSchema {
    id: String,
    #[schema(example = "Toyota")]
    brand: String,
    #[schema(example = "Corolla")]
    model: String,
    #[schema(example = 2020)]
    year: i32,
    #[schema(example = "AB-123")]
    license_plate: String,
    /// Decimal string.
    #[schema(example = "100.00")]
    price_per_day: String,
    #[schema(example = "available")]
    status: String,
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Rental`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Rental)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RentalSchema {
    id: String,
    user_id: String,
    car_id: String,
    #[schema(example = "2024-01-01T00:00:00Z")]
    start_date: String,
    #[schema(example = "2024-01-04T00:00:00Z")]
    end_date: String,
    /// Price fixed when the rental was booked, as a decimal string.
    #[schema(example = "300.00")]
    total_price: String,
    #[schema(example = "unpaid")]
    status: String,
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Payment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Payment)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaymentSchema {
    id: String,
    rental_id: String,
    #[schema(example = "300.00")]
    amount: String,
    /// Empty until the payment is settled.
    #[schema(example = "card")]
    method: Option<String>,
    #[schema(example = "paid")]
    status: String,
    created_at: String,
    paid_at: Option<String>,
}
