//! Rental bookings and their payment state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::{CarId, Money, RentalId, RentalPeriod, UserId};

/// Illegal lifecycle transitions on a rental or its payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The rental (or payment) is already settled.
    #[error("rental already paid")]
    AlreadyPaid,
    /// The payment has not been settled yet.
    #[error("payment has not been settled")]
    NotSettled,
}

/// Settlement status shared by rentals and payments: `unpaid` → `paid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting settlement.
    #[default]
    Unpaid,
    /// Settled; no further changes to price or period.
    Paid,
}

/// Rentals move through the same two states as their payment.
pub type RentalStatus = PaymentStatus;

impl PaymentStatus {
    /// Lowercase wire and storage form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// A booking of one car by one user over a period.
///
/// ## Invariants
/// - `total_price` is fixed at creation (or reschedule) from the car's rate
///   at that moment; later rate changes do not affect it.
/// - `status` only moves `unpaid` → `paid` via [`Rental::mark_paid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    id: RentalId,
    user_id: UserId,
    car_id: CarId,
    #[serde(flatten)]
    period: RentalPeriod,
    total_price: Money,
    status: RentalStatus,
    created_at: DateTime<Utc>,
}

impl Rental {
    /// A fresh, unpaid rental.
    pub fn new(
        id: RentalId,
        user_id: UserId,
        car_id: CarId,
        period: RentalPeriod,
        total_price: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            car_id,
            period,
            total_price,
            status: RentalStatus::Unpaid,
            created_at,
        }
    }

    /// Rehydrate a stored rental, including its status.
    pub fn restore(
        id: RentalId,
        user_id: UserId,
        car_id: CarId,
        period: RentalPeriod,
        total_price: Money,
        status: RentalStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            car_id,
            period,
            total_price,
            status,
            created_at,
        }
    }

    /// Stable rental identifier.
    pub fn id(&self) -> RentalId {
        self.id
    }

    /// The customer who booked.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The booked car.
    pub fn car_id(&self) -> CarId {
        self.car_id
    }

    /// Booked start and end instants.
    pub fn period(&self) -> RentalPeriod {
        self.period
    }

    /// Price fixed when the rental was booked or rescheduled.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Payment status, mirrored from the payment.
    pub fn status(&self) -> RentalStatus {
        self.status
    }

    /// Booking time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the rental has been settled.
    pub fn is_paid(&self) -> bool {
        self.status == RentalStatus::Paid
    }

    /// Settle the rental.
    pub fn mark_paid(&mut self) -> Result<(), LifecycleError> {
        if self.is_paid() {
            return Err(LifecycleError::AlreadyPaid);
        }
        self.status = RentalStatus::Paid;
        Ok(())
    }

    /// Move an unpaid rental to a new period at a new price.
    pub fn reschedule(
        &mut self,
        period: RentalPeriod,
        total_price: Money,
    ) -> Result<(), LifecycleError> {
        if self.is_paid() {
            return Err(LifecycleError::AlreadyPaid);
        }
        self.period = period;
        self.total_price = total_price;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    #[fixture]
    fn rental() -> Rental {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp");
        let period = RentalPeriod::new(start, start + Duration::days(3)).expect("period");
        Rental::new(
            RentalId::random(),
            UserId::random(),
            CarId::random(),
            period,
            Money::new(Decimal::new(300, 0)).expect("money"),
            start,
        )
    }

    #[rstest]
    fn new_rentals_start_unpaid(rental: Rental) {
        assert_eq!(rental.status(), RentalStatus::Unpaid);
    }

    #[rstest]
    fn mark_paid_is_terminal(mut rental: Rental) {
        rental.mark_paid().expect("first settlement");
        assert!(rental.is_paid());
        assert_eq!(rental.mark_paid(), Err(LifecycleError::AlreadyPaid));
    }

    #[rstest]
    fn paid_rentals_cannot_be_rescheduled(mut rental: Rental) {
        rental.mark_paid().expect("settled");
        let period = rental.period();
        assert_eq!(
            rental.reschedule(period, Money::ZERO),
            Err(LifecycleError::AlreadyPaid)
        );
    }

    #[rstest]
    fn serialises_period_inline(rental: Rental) {
        let value = serde_json::to_value(&rental).expect("serialise rental");
        assert_eq!(value["startDate"], "2024-01-01T00:00:00Z");
        assert_eq!(value["endDate"], "2024-01-04T00:00:00Z");
        assert_eq!(value["totalPrice"], "300.00");
        assert_eq!(value["status"], "unpaid");
    }

    #[rstest]
    #[case("unpaid", PaymentStatus::Unpaid)]
    #[case("paid", PaymentStatus::Paid)]
    fn status_parses(#[case] raw: &str, #[case] expected: PaymentStatus) {
        assert_eq!(raw.parse::<PaymentStatus>(), Ok(expected));
    }
}
