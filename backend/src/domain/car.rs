//! Car inventory model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::{CarId, DailyRate};

/// Earliest accepted model year.
pub const MIN_CAR_YEAR: i32 = 1886;
/// Latest accepted model year.
pub const MAX_CAR_YEAR: i32 = 9999;

/// Validation errors for car fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarValidationError {
    /// Brand was blank.
    #[error("brand must not be empty")]
    EmptyBrand,
    /// Model was blank.
    #[error("model must not be empty")]
    EmptyModel,
    /// Model year outside the accepted range.
    #[error("year must be between 1886 and 9999, got {0}")]
    YearOutOfRange(i32),
    /// License plate was blank.
    #[error("license plate must not be empty")]
    EmptyLicensePlate,
    /// Daily rate was zero or negative.
    #[error("price per day must be greater than zero")]
    NonPositiveRate,
    /// Status string is not one of the known values.
    #[error("unknown car status: {0}")]
    UnknownStatus(String),
}

/// Availability of a car in the fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    /// Ready to be rented.
    #[default]
    Available,
    /// Currently out with a customer.
    Rented,
    /// Out of service.
    Maintenance,
}

impl CarStatus {
    /// Lowercase wire and storage form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Rented => "rented",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = CarValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(Self::Available),
            "rented" => Ok(Self::Rented),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(CarValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

fn non_empty(value: &str, error: CarValidationError) -> Result<String, CarValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn checked_year(year: i32) -> Result<i32, CarValidationError> {
    if (MIN_CAR_YEAR..=MAX_CAR_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(CarValidationError::YearOutOfRange(year))
    }
}

fn checked_rate(rate: Decimal) -> Result<DailyRate, CarValidationError> {
    DailyRate::new(rate).map_err(|_| CarValidationError::NonPositiveRate)
}

/// A car available for hire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    id: CarId,
    brand: String,
    model: String,
    year: i32,
    license_plate: String,
    price_per_day: DailyRate,
    status: CarStatus,
    created_at: DateTime<Utc>,
}

impl Car {
    /// Create a car from a validated draft.
    pub fn new(id: CarId, draft: CarDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            brand: draft.brand,
            model: draft.model,
            year: draft.year,
            license_plate: draft.license_plate,
            price_per_day: draft.price_per_day,
            status: draft.status,
            created_at,
        }
    }

    /// Stable car identifier.
    pub fn id(&self) -> CarId {
        self.id
    }

    /// Manufacturer, e.g. `Toyota`.
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Model year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Registration plate.
    pub fn license_plate(&self) -> &str {
        &self.license_plate
    }

    /// Current daily rate applied to new rentals.
    pub fn price_per_day(&self) -> DailyRate {
        self.price_per_day
    }

    /// Availability in the fleet.
    pub fn status(&self) -> CarStatus {
        self.status
    }

    /// When the car joined the fleet.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a validated partial update. Existing rentals keep their price.
    pub fn apply(&mut self, changes: CarChanges) {
        if let Some(brand) = changes.brand {
            self.brand = brand;
        }
        if let Some(model) = changes.model {
            self.model = model;
        }
        if let Some(year) = changes.year {
            self.year = year;
        }
        if let Some(plate) = changes.license_plate {
            self.license_plate = plate;
        }
        if let Some(rate) = changes.price_per_day {
            self.price_per_day = rate;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

/// Validated fields for a new car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDraft {
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Registration plate.
    pub license_plate: String,
    /// Daily rate.
    pub price_per_day: DailyRate,
    /// Initial availability.
    pub status: CarStatus,
}

impl CarDraft {
    /// Validate raw car fields. A missing status defaults to `available`.
    pub fn try_from_parts(
        brand: &str,
        model: &str,
        year: i32,
        license_plate: &str,
        price_per_day: Decimal,
        status: Option<&str>,
    ) -> Result<Self, CarValidationError> {
        Ok(Self {
            brand: non_empty(brand, CarValidationError::EmptyBrand)?,
            model: non_empty(model, CarValidationError::EmptyModel)?,
            year: checked_year(year)?,
            license_plate: non_empty(license_plate, CarValidationError::EmptyLicensePlate)?,
            price_per_day: checked_rate(price_per_day)?,
            status: status.map(str::parse::<CarStatus>).transpose()?.unwrap_or_default(),
        })
    }
}

/// Partial car update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarChanges {
    /// New manufacturer.
    pub brand: Option<String>,
    /// New model name.
    pub model: Option<String>,
    /// New model year.
    pub year: Option<i32>,
    /// New registration plate.
    pub license_plate: Option<String>,
    /// New daily rate; existing rentals keep their price.
    pub price_per_day: Option<DailyRate>,
    /// New availability.
    pub status: Option<CarStatus>,
}

/// Raw, unvalidated update fields as received by an adapter.
#[derive(Debug, Clone, Default)]
pub struct RawCarChanges<'a> {
    /// Raw brand.
    pub brand: Option<&'a str>,
    /// Raw model name.
    pub model: Option<&'a str>,
    /// Raw model year.
    pub year: Option<i32>,
    /// Raw registration plate.
    pub license_plate: Option<&'a str>,
    /// Raw daily rate.
    pub price_per_day: Option<Decimal>,
    /// Raw status string.
    pub status: Option<&'a str>,
}

impl TryFrom<RawCarChanges<'_>> for CarChanges {
    type Error = CarValidationError;

    fn try_from(raw: RawCarChanges<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            brand: raw
                .brand
                .map(|v| non_empty(v, CarValidationError::EmptyBrand))
                .transpose()?,
            model: raw
                .model
                .map(|v| non_empty(v, CarValidationError::EmptyModel))
                .transpose()?,
            year: raw.year.map(checked_year).transpose()?,
            license_plate: raw
                .license_plate
                .map(|v| non_empty(v, CarValidationError::EmptyLicensePlate))
                .transpose()?,
            price_per_day: raw.price_per_day.map(checked_rate).transpose()?,
            status: raw.status.map(str::parse::<CarStatus>).transpose()?,
        })
    }
}
