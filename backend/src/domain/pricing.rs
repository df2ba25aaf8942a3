//! Rental price calculation.
//!
//! A rental is charged pro rata by the second:
//! `total = rate × seconds / 86_400`, rounded to cents. Multiplying before
//! dividing keeps whole-day ranges exact.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::{DailyRate, Money};

/// Seconds in one rental day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Failures raised while pricing a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The end of the range precedes its start (or equals it, for periods).
    #[error("end date must be after start date")]
    InvalidDateRange,
    /// Decimal arithmetic overflowed.
    #[error("rental price overflowed")]
    Overflow,
}

/// Compute the total price for renting at `daily_rate` from `start` to `end`.
///
/// Returns zero for an empty range.
///
/// # Examples
/// ```
/// use carhire::domain::{compute_total, DailyRate};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let rate = DailyRate::new(Decimal::new(100, 0)).expect("positive rate");
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
/// assert_eq!(compute_total(rate, start, end).unwrap().to_string(), "300.00");
/// ```
pub fn compute_total(
    daily_rate: DailyRate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Money, PricingError> {
    if end < start {
        return Err(PricingError::InvalidDateRange);
    }
    let seconds = (end - start).num_seconds();
    let total = daily_rate
        .amount()
        .checked_mul(Decimal::from(seconds))
        .and_then(|product| product.checked_div(Decimal::from(SECONDS_PER_DAY)))
        .ok_or(PricingError::Overflow)?;
    Money::new(total).map_err(|_| PricingError::Overflow)
}

/// A validated, non-empty rental period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPeriod {
    #[serde(rename = "startDate")]
    start: DateTime<Utc>,
    #[serde(rename = "endDate")]
    end: DateTime<Utc>,
}

impl RentalPeriod {
    /// Build a period; `end` must be strictly after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, PricingError> {
        if end <= start {
            return Err(PricingError::InvalidDateRange);
        }
        Ok(Self { start, end })
    }

    /// First instant of the rental.
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Instant the car is due back.
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Price this period at `daily_rate`.
    pub fn price(&self, daily_rate: DailyRate) -> Result<Money, PricingError> {
        compute_total(daily_rate, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    fn rate(units: i64, scale: u32) -> DailyRate {
        DailyRate::new(Decimal::new(units, scale)).expect("positive rate")
    }

    #[fixture]
    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(rate(100, 0), Duration::days(3), "300.00")]
    #[case(rate(4999, 2), Duration::days(7), "349.93")]
    #[case(rate(100, 0), Duration::hours(12), "50.00")]
    #[case(rate(100, 0), Duration::hours(1), "4.17")]
    #[case(rate(3333, 2), Duration::days(30), "999.90")]
    fn charges_pro_rata(
        start: DateTime<Utc>,
        #[case] daily_rate: DailyRate,
        #[case] length: Duration,
        #[case] expected: &str,
    ) {
        let total = compute_total(daily_rate, start, start + length).expect("priced");
        assert_eq!(total.to_string(), expected);
    }

    #[rstest]
    fn empty_range_costs_nothing(start: DateTime<Utc>) {
        let total = compute_total(rate(100, 0), start, start).expect("priced");
        assert_eq!(total, Money::ZERO);
    }

    #[rstest]
    fn reversed_range_is_rejected(start: DateTime<Utc>) {
        let err = compute_total(rate(100, 0), start, start - Duration::days(1))
            .expect_err("reversed range");
        assert_eq!(err, PricingError::InvalidDateRange);
    }

    #[rstest]
    fn overflow_is_reported(start: DateTime<Utc>) {
        let huge = DailyRate::new(Decimal::MAX).expect("positive rate");
        let err = compute_total(huge, start, start + Duration::days(365_000))
            .expect_err("overflow");
        assert_eq!(err, PricingError::Overflow);
    }

    #[rstest]
    #[case(Duration::zero())]
    #[case(Duration::seconds(-1))]
    fn period_requires_start_before_end(start: DateTime<Utc>, #[case] offset: Duration) {
        assert_eq!(
            RentalPeriod::new(start, start + offset),
            Err(PricingError::InvalidDateRange)
        );
    }

    #[rstest]
    fn period_prices_through_calculator(start: DateTime<Utc>) {
        let period = RentalPeriod::new(start, start + Duration::days(3)).expect("valid period");
        assert_eq!(period.price(rate(100, 0)).expect("priced").to_string(), "300.00");
    }
}
