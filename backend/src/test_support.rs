//! Shared test doubles for unit tests inside the crate.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

use crate::domain::{
    Car, CarDraft, CarId, EmailAddress, FullName, Money, PasswordHash, Payment, PaymentId,
    PhoneNumber, Rental, RentalId, RentalPeriod, Role, User, UserId, UserRecord,
};

/// Clock pinned to a settable instant.
pub struct FixtureClock(Mutex<DateTime<Utc>>);

impl FixtureClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// 2024-01-01T00:00:00Z.
    pub fn new_year_2024() -> Self {
        Self::new(ymd(2024, 1, 1))
    }

    pub fn advance_hours(&self, hours: i64) {
        *self.lock_clock() += TimeDelta::hours(hours);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Midnight UTC on the given date.
pub fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single() {
        Some(value) => value,
        None => panic!("invalid fixture date {year}-{month}-{day}"),
    }
}

/// A customer account with a placeholder hash.
pub fn sample_user() -> User {
    User::from(UserRecord {
        id: UserId::random(),
        full_name: FullName::new("Ada Lovelace").unwrap_or_else(|err| panic!("{err}")),
        email: EmailAddress::new("ada@example.com").unwrap_or_else(|err| panic!("{err}")),
        password_hash: PasswordHash::from_hash("hashed:secret"),
        phone: PhoneNumber::new("555-0100").unwrap_or_else(|err| panic!("{err}")),
        role: Role::Customer,
        created_at: ymd(2023, 6, 1),
    })
}

/// An available car renting at `rate` per day.
pub fn sample_car(rate: Decimal) -> Car {
    let draft = CarDraft::try_from_parts("Toyota", "Corolla", 2020, "AB-123", rate, None)
        .unwrap_or_else(|err| panic!("{err}"));
    Car::new(CarId::random(), draft, ymd(2023, 6, 1))
}

/// An unpaid rental of `car` by `user` from 2024-01-01 to 2024-01-04 at 300.00.
pub fn sample_rental(user: UserId, car: CarId) -> (Rental, Payment) {
    let period = RentalPeriod::new(ymd(2024, 1, 1), ymd(2024, 1, 4))
        .unwrap_or_else(|err| panic!("{err}"));
    let total = Money::new(Decimal::new(300, 0)).unwrap_or_else(|err| panic!("{err}"));
    let rental = Rental::new(RentalId::random(), user, car, period, total, ymd(2023, 12, 1));
    let payment = Payment::placeholder(PaymentId::random(), rental.id(), total, ymd(2023, 12, 1));
    (rental, payment)
}
