//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies arrive as loosely typed DTOs; these helpers turn their raw
//! strings into domain values and report failures as `invalid_request`
//! errors carrying the offending camelCase field name.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{
    CarValidationError, Error, IdParseError, LoginValidationError, MoneyError,
    PaymentMethodError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_field_error(field: FieldName, message: impl Into<String>) -> Error {
    ValidationError::new(field, message).with_code(ErrorCode::InvalidValue)
}

/// Require an optional body field to be present.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a typed identifier such as [`crate::domain::RentalId`].
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    value.parse::<T>().map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidUuid, value)
    })
}

/// Parse a rental boundary: an RFC 3339 timestamp, or a bare `YYYY-MM-DD`
/// date meaning midnight UTC.
pub(crate) fn parse_instant(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(
                field,
                format!("{name} must be an RFC 3339 timestamp or a YYYY-MM-DD date"),
            )
            .with_value(ErrorCode::InvalidTimestamp, value)
        })
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::EmptyFullName => ("fullName", "empty_full_name"),
        UserValidationError::EmptyEmail => ("email", "empty_email"),
        UserValidationError::InvalidEmail => ("email", "invalid_email"),
        UserValidationError::EmptyPhone => ("phone", "empty_phone"),
        UserValidationError::EmptyPassword => ("password", "empty_password"),
        UserValidationError::UnknownRole(_) => ("role", "unknown_role"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn map_car_validation_error(err: CarValidationError) -> Error {
    let (field, code) = match &err {
        CarValidationError::EmptyBrand => ("brand", "empty_brand"),
        CarValidationError::EmptyModel => ("model", "empty_model"),
        CarValidationError::YearOutOfRange(_) => ("year", "year_out_of_range"),
        CarValidationError::EmptyLicensePlate => ("licensePlate", "empty_license_plate"),
        CarValidationError::NonPositiveRate => ("pricePerDay", "non_positive_rate"),
        CarValidationError::UnknownStatus(_) => ("status", "unknown_status"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn map_payment_method_error(err: PaymentMethodError) -> Error {
    let code = match err {
        PaymentMethodError::Empty => "empty_method",
        PaymentMethodError::TooLong { .. } => "method_too_long",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "method", "code": code }))
}

pub(crate) fn map_amount_error(err: MoneyError) -> Error {
    invalid_field_error(FieldName::new("amount"), err.to_string())
}
