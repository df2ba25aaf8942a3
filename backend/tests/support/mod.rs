//! Shared wiring for integration tests over the in-memory store.

use std::sync::{Arc, Mutex, MutexGuard};

use carhire::domain::ports::{CarsCommand, UsersCommand};
use carhire::domain::{
    AccountService, Car, CarDraft, CarService, RentalService, SettlementService, User, UserDraft,
};
use carhire::inbound::http::state::{HttpState, HttpStateBookingPorts, HttpStatePorts};
use carhire::outbound::memory::InMemoryStore;
use carhire::outbound::security::{BcryptPasswordHasher, JwtTokenIssuer};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const CUSTOMER_EMAIL: &str = "ada@example.com";
pub const CUSTOMER_PASSWORD: &str = "correct horse";

/// Clock pinned to a settable instant.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_hours(&self, hours: i64) {
        *self.guard() += TimeDelta::hours(hours);
    }

    fn guard(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.guard()
    }
}

/// Midnight UTC on the given date.
pub fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid fixture date")
}

pub type Accounts = AccountService<InMemoryStore, BcryptPasswordHasher, JwtTokenIssuer>;

/// Every service wired over one shared store.
pub struct Booking {
    pub clock: Arc<FixedClock>,
    pub accounts: Arc<Accounts>,
    pub cars: Arc<CarService<InMemoryStore>>,
    pub rentals: Arc<RentalService<InMemoryStore, InMemoryStore, InMemoryStore>>,
    pub payments: Arc<SettlementService<InMemoryStore, InMemoryStore>>,
}

impl Booking {
    /// Services whose clock reads 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        Self::at(ymd(2024, 1, 1))
    }

    /// Services whose clock reads `now`. Token expiry is checked against the
    /// system clock, so HTTP tests start near the real time.
    pub fn at(now: DateTime<Utc>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::at(now));
        let shared: Arc<dyn Clock> = clock.clone();
        Self {
            accounts: Arc::new(AccountService::new(
                Arc::clone(&store),
                Arc::new(BcryptPasswordHasher::new(4)),
                Arc::new(JwtTokenIssuer::new(SECRET)),
                Arc::clone(&shared),
            )),
            cars: Arc::new(CarService::new(Arc::clone(&store), Arc::clone(&shared))),
            rentals: Arc::new(RentalService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&shared),
            )),
            payments: Arc::new(SettlementService::new(Arc::clone(&store), store, shared)),
            clock,
        }
    }

    /// HTTP state backed by the same services.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                login: self.accounts.clone(),
                users_query: self.accounts.clone(),
                users_command: self.accounts.clone(),
                cars_query: self.cars.clone(),
                cars_command: self.cars.clone(),
            },
            HttpStateBookingPorts {
                rentals: self.rentals.clone(),
                rentals_query: self.rentals.clone(),
                payments: self.payments.clone(),
                payments_query: self.payments.clone(),
            },
        )
    }

    pub async fn customer(&self) -> User {
        let draft =
            UserDraft::try_from_parts("Ada Lovelace", CUSTOMER_EMAIL, CUSTOMER_PASSWORD, "555-0100")
                .expect("valid customer");
        self.accounts.register(draft).await.expect("customer registered")
    }

    pub async fn car(&self, rate_per_day: i64) -> Car {
        let draft = CarDraft::try_from_parts(
            "Toyota",
            "Corolla",
            2020,
            "AB-123",
            Decimal::new(rate_per_day, 0),
            None,
        )
        .expect("valid car");
        self.cars.add_car(draft).await.expect("car added")
    }
}

/// The `code` entry of an error's details, if any.
pub fn detail_code(error: &carhire::domain::Error) -> Option<&str> {
    error
        .details()
        .and_then(|details| details.get("code"))
        .and_then(serde_json::Value::as_str)
}
