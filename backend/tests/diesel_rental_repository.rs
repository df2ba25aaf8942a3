//! Integration tests for `DieselRentalRepository` against embedded PostgreSQL.
//!
//! These cover the transactional guarantees the in-memory store can only
//! imitate: rental and payment rows are written or rolled back together, and
//! conditional settlement updates lose cleanly against a concurrent
//! settlement or reschedule. Each test runs in its own temporary database.

use carhire::domain::ports::{
    CarRepository, PaymentRepository, RentalRepository, RentalRepositoryError, UserRepository,
};
use carhire::domain::{
    Car, CarDraft, CarId, EmailAddress, FullName, Money, PasswordHash, Payment, PaymentId,
    PaymentMethod, PhoneNumber, Rental, RentalId, RentalPeriod, Role, User, UserId, UserRecord,
};
use carhire::outbound::persistence::{
    DbPool, DieselCarRepository, DieselPaymentRepository, DieselRentalRepository,
    DieselUserRepository, PoolConfig,
};
use chrono::{DateTime, TimeZone, Utc};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{handle_cluster_setup_failure, provision_database, shared_cluster};

// -----------------------------------------------------------------------------
// Test Context
// -----------------------------------------------------------------------------

struct DieselWorld {
    /// Tokio runtime reused for all async operations in this test.
    runtime: Runtime,
    rentals: DieselRentalRepository,
    payments: DieselPaymentRepository,
    user: User,
    car: Car,
    _database: TemporaryDatabase,
}

impl DieselWorld {
    /// Insert a fresh unpaid rental and its payment.
    fn booked(&self) -> (Rental, Payment) {
        let (rental, payment) = unpaid_rental(self.user.id(), self.car.id());
        self.runtime
            .block_on(self.rentals.create_with_payment(&rental, &payment))
            .expect("rental created");
        (rental, payment)
    }

    fn stored_rental(&self, id: &RentalId) -> Option<Rental> {
        self.runtime
            .block_on(RentalRepository::find_by_id(&self.rentals, id))
            .expect("rental lookup")
    }

    fn stored_payment(&self, id: &PaymentId) -> Option<Payment> {
        self.runtime
            .block_on(PaymentRepository::find_by_id(&self.payments, id))
            .expect("payment lookup")
    }
}

fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid fixture date")
}

fn money(amount: i64) -> Money {
    Money::new(Decimal::new(amount, 0)).expect("valid money")
}

fn customer() -> User {
    User::from(UserRecord {
        id: UserId::random(),
        full_name: FullName::new("Ada Lovelace").expect("name"),
        email: EmailAddress::new("ada@example.com").expect("email"),
        password_hash: PasswordHash::from_hash("hashed:secret"),
        phone: PhoneNumber::new("555-0100").expect("phone"),
        role: Role::Customer,
        created_at: ymd(2023, 6, 1),
    })
}

fn corolla() -> Car {
    let draft =
        CarDraft::try_from_parts("Toyota", "Corolla", 2020, "AB-123", Decimal::new(100, 0), None)
            .expect("valid car");
    Car::new(CarId::random(), draft, ymd(2023, 6, 1))
}

/// Three days from 2024-01-01 at 300.00.
fn unpaid_rental(user: UserId, car: CarId) -> (Rental, Payment) {
    let period = RentalPeriod::new(ymd(2024, 1, 1), ymd(2024, 1, 4)).expect("period");
    let rental = Rental::new(
        RentalId::random(),
        user,
        car,
        period,
        money(300),
        ymd(2023, 12, 1),
    );
    let payment = Payment::placeholder(PaymentId::random(), rental.id(), money(300), ymd(2023, 12, 1));
    (rental, payment)
}

/// Transition both records to `paid` as the settlement service would.
fn settled(mut rental: Rental, mut payment: Payment, method: &str) -> (Rental, Payment) {
    rental.mark_paid().expect("mark paid");
    payment
        .settle(PaymentMethod::new(method).expect("method"), ymd(2024, 1, 2))
        .expect("settle");
    (rental, payment)
}

fn setup_world() -> Result<DieselWorld, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_database(cluster, &runtime)?;

    let config = PoolConfig::new(database.url().to_string()).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let user = customer();
    let car = corolla();
    runtime
        .block_on(DieselUserRepository::new(pool.clone()).insert(&user))
        .map_err(|err| err.to_string())?;
    runtime
        .block_on(DieselCarRepository::new(pool.clone()).insert(&car))
        .map_err(|err| err.to_string())?;

    Ok(DieselWorld {
        runtime,
        rentals: DieselRentalRepository::new(pool.clone()),
        payments: DieselPaymentRepository::new(pool),
        user,
        car,
        _database: database,
    })
}

#[fixture]
fn diesel_world() -> Option<DieselWorld> {
    match setup_world() {
        Ok(world) => Some(world),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[rstest]
fn failed_payment_insert_rolls_back_the_rental(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: failed_payment_insert_rolls_back_the_rental skipped");
        return;
    };
    let (_, existing_payment) = world.booked();
    let (rental, _) = unpaid_rental(world.user.id(), world.car.id());
    let clashing = Payment::placeholder(
        existing_payment.id(),
        rental.id(),
        money(300),
        ymd(2023, 12, 1),
    );

    let error = world
        .runtime
        .block_on(world.rentals.create_with_payment(&rental, &clashing))
        .expect_err("duplicate payment id");

    assert!(
        matches!(error, RentalRepositoryError::Query { .. }),
        "expected Query error, got: {error:?}"
    );
    assert!(world.stored_rental(&rental.id()).is_none());
    let payments = world
        .runtime
        .block_on(PaymentRepository::list(&world.payments))
        .expect("payments");
    assert_eq!(payments.len(), 1);
}

#[rstest]
fn missing_car_is_a_missing_reference(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: missing_car_is_a_missing_reference skipped");
        return;
    };
    let (rental, payment) = unpaid_rental(world.user.id(), CarId::random());

    let error = world
        .runtime
        .block_on(world.rentals.create_with_payment(&rental, &payment))
        .expect_err("unknown car");

    assert!(matches!(error, RentalRepositoryError::MissingReference { .. }));
    assert!(world.stored_payment(&payment.id()).is_none());
}

#[rstest]
fn settlement_round_trips_through_the_database(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: settlement_round_trips_through_the_database skipped");
        return;
    };
    let (rental, payment) = world.booked();
    let (rental, payment) = settled(rental, payment, "card");

    world
        .runtime
        .block_on(world.rentals.commit_settlement(&rental, &payment))
        .expect("committed");

    assert!(world.stored_rental(&rental.id()).expect("rental").is_paid());
    let stored = world.stored_payment(&payment.id()).expect("payment");
    assert!(stored.is_paid());
    assert_eq!(stored.method().map(AsRef::as_ref), Some("card"));
    assert_eq!(stored.paid_at(), Some(ymd(2024, 1, 2)));
}

#[rstest]
fn settling_a_paid_rental_is_stale(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: settling_a_paid_rental_is_stale skipped");
        return;
    };
    let (rental, payment) = world.booked();
    let (first_rental, first_payment) = settled(rental.clone(), payment.clone(), "card");
    let (second_rental, second_payment) = settled(rental, payment, "cash");
    world
        .runtime
        .block_on(world.rentals.commit_settlement(&first_rental, &first_payment))
        .expect("first commit");

    let error = world
        .runtime
        .block_on(world.rentals.commit_settlement(&second_rental, &second_payment))
        .expect_err("second commit");

    assert!(matches!(error, RentalRepositoryError::Stale { .. }));
    let stored = world.stored_payment(&first_payment.id()).expect("payment");
    assert_eq!(stored.method().map(AsRef::as_ref), Some("card"));
}

#[rstest]
fn rescheduling_a_paid_rental_is_stale(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: rescheduling_a_paid_rental_is_stale skipped");
        return;
    };
    let (rental, payment) = world.booked();
    let (paid_rental, paid_payment) = settled(rental.clone(), payment, "card");
    world
        .runtime
        .block_on(world.rentals.commit_settlement(&paid_rental, &paid_payment))
        .expect("committed");
    let mut rescheduled = rental;
    rescheduled
        .reschedule(
            RentalPeriod::new(ymd(2024, 2, 1), ymd(2024, 2, 3)).expect("period"),
            money(200),
        )
        .expect("reschedule in memory");

    let error = world
        .runtime
        .block_on(world.rentals.reschedule(&rescheduled))
        .expect_err("paid rental");

    assert!(matches!(error, RentalRepositoryError::Stale { .. }));
    let stored = world.stored_rental(&paid_rental.id()).expect("rental");
    assert_eq!(stored.total_price(), money(300));
    assert_eq!(stored.period(), paid_rental.period());
}

#[rstest]
fn settlement_read_before_a_reschedule_is_stale(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: settlement_read_before_a_reschedule_is_stale skipped");
        return;
    };
    let (rental, payment) = world.booked();
    let read_for_settlement = world.stored_rental(&rental.id()).expect("rental");
    let mut rescheduled = rental;
    rescheduled
        .reschedule(
            RentalPeriod::new(ymd(2024, 2, 1), ymd(2024, 2, 3)).expect("period"),
            money(200),
        )
        .expect("reschedule in memory");
    world
        .runtime
        .block_on(world.rentals.reschedule(&rescheduled))
        .expect("rescheduled");
    let (stale_rental, stale_payment) = settled(read_for_settlement, payment, "card");

    let error = world
        .runtime
        .block_on(world.rentals.commit_settlement(&stale_rental, &stale_payment))
        .expect_err("repriced rental");

    assert!(matches!(error, RentalRepositoryError::Stale { .. }));
    let stored = world.stored_rental(&rescheduled.id()).expect("rental");
    assert!(!stored.is_paid());
    assert_eq!(stored.total_price(), money(200));
    let stored_payment = world.stored_payment(&stale_payment.id()).expect("payment");
    assert!(!stored_payment.is_paid());
    assert!(stored_payment.method().is_none());
    assert_eq!(stored_payment.amount(), money(200));
}

#[rstest]
fn concurrent_settlements_on_two_connections_commit_once(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!(
            "SKIP-TEST-CLUSTER: concurrent_settlements_on_two_connections_commit_once skipped"
        );
        return;
    };
    let (rental, payment) = world.booked();
    let (left_rental, left_payment) = settled(rental.clone(), payment.clone(), "card");
    let (right_rental, right_payment) = settled(rental, payment, "cash");
    let left_repo = world.rentals.clone();
    let right_repo = world.rentals.clone();

    let (left, right) = world.runtime.block_on(async move {
        let left = tokio::spawn(async move {
            left_repo
                .commit_settlement(&left_rental, &left_payment)
                .await
        });
        let right = tokio::spawn(async move {
            right_repo
                .commit_settlement(&right_rental, &right_payment)
                .await
        });
        (
            left.await.expect("left task"),
            right.await.expect("right task"),
        )
    });

    let outcomes = [left, right];
    let committed = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let stale = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(RentalRepositoryError::Stale { .. })))
        .count();
    assert_eq!(committed, 1, "exactly one commit must land: {outcomes:?}");
    assert_eq!(stale, 1, "the other commit must be stale: {outcomes:?}");
}

#[rstest]
fn delete_pair_removes_rental_and_payment(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: delete_pair_removes_rental_and_payment skipped");
        return;
    };
    let (rental, payment) = world.booked();
    let (other_rental, other_payment) = world.booked();

    let deleted = world
        .runtime
        .block_on(RentalRepository::delete_pair(&world.rentals, &rental.id()))
        .expect("delete by rental");
    let deleted_again = world
        .runtime
        .block_on(RentalRepository::delete_pair(&world.rentals, &rental.id()))
        .expect("repeat delete");
    let deleted_by_payment = world
        .runtime
        .block_on(PaymentRepository::delete_pair(
            &world.payments,
            &other_payment.id(),
        ))
        .expect("delete by payment");

    assert!(deleted);
    assert!(!deleted_again);
    assert!(deleted_by_payment);
    assert!(world.stored_rental(&rental.id()).is_none());
    assert!(world.stored_payment(&payment.id()).is_none());
    assert!(world.stored_rental(&other_rental.id()).is_none());
    assert!(world.stored_payment(&other_payment.id()).is_none());
}
