//! Monetary value objects.
//!
//! Amounts are exact decimals with two fractional digits. They serialise as
//! decimal strings (`"300.00"`) so clients never see binary float rounding.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits kept for every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Validation errors for monetary values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amounts may not be negative.
    #[error("amount must not be negative")]
    Negative,
    /// Daily rates must be strictly positive.
    #[error("price per day must be greater than zero")]
    NotPositive,
}

/// Non-negative amount rounded to two decimal places.
///
/// # Examples
/// ```
/// use carhire::domain::Money;
/// use rust_decimal::Decimal;
///
/// let money = Money::new(Decimal::new(12345, 3)).expect("non-negative");
/// assert_eq!(money.to_string(), "12.35");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Round `value` to two decimal places (midpoint away from zero).
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative);
        }
        let mut rounded =
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_SCALE);
        Ok(Self(rounded))
    }

    /// Underlying decimal value.
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strictly positive price charged per rental day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DailyRate(Decimal);

impl DailyRate {
    /// Validate that the rate is greater than zero.
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        Ok(Self(value.normalize()))
    }

    /// Underlying decimal value.
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for DailyRate {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DailyRate> for Decimal {
    fn from(value: DailyRate) -> Self {
        value.0
    }
}

impl fmt::Display for DailyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
