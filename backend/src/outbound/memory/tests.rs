//! Tests for the in-memory record store.

use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use super::*;
use crate::domain::{Money, PaymentMethod, RentalPeriod};
use crate::test_support::{sample_car, sample_rental, sample_user, ymd};

struct Seeded {
    store: InMemoryStore,
    user: User,
    car: Car,
}

#[fixture]
async fn seeded() -> Seeded {
    let store = InMemoryStore::new();
    let user = sample_user();
    let car = sample_car(Decimal::new(100, 0));
    UserRepository::insert(&store, &user).await.expect("user");
    CarRepository::insert(&store, &car).await.expect("car");
    Seeded { store, user, car }
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(#[future] seeded: Seeded) {
    let Seeded { store, .. } = seeded.await;

    let error = UserRepository::insert(&store, &sample_user())
        .await
        .expect_err("duplicate");

    assert!(matches!(error, UserRepositoryError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn find_by_email_matches_stored_address(#[future] seeded: Seeded) {
    let Seeded { store, user, .. } = seeded.await;

    let found = store
        .find_by_email("ada@example.com")
        .await
        .expect("lookup");

    assert_eq!(found.map(|found| found.id()), Some(user.id()));
}

#[rstest]
#[tokio::test]
async fn rental_and_payment_are_written_together(#[future] seeded: Seeded) {
    let Seeded { store, user, car } = seeded.await;
    let (rental, payment) = sample_rental(user.id(), car.id());

    store
        .create_with_payment(&rental, &payment)
        .await
        .expect("created");

    assert_eq!(RentalRepository::list(&store).await.expect("rentals").len(), 1);
    let stored = store
        .find_by_rental(&rental.id())
        .await
        .expect("lookup")
        .expect("payment");
    assert_eq!(stored.id(), payment.id());
}

#[rstest]
#[tokio::test]
async fn missing_car_writes_nothing(#[future] seeded: Seeded) {
    let Seeded { store, user, .. } = seeded.await;
    let (rental, payment) = sample_rental(user.id(), CarId::random());

    let error = store
        .create_with_payment(&rental, &payment)
        .await
        .expect_err("missing car");

    assert!(matches!(error, RentalRepositoryError::MissingReference { .. }));
    assert!(RentalRepository::list(&store).await.expect("rentals").is_empty());
    assert!(PaymentRepository::list(&store).await.expect("payments").is_empty());
}

#[rstest]
#[tokio::test]
async fn second_settlement_commit_is_stale(#[future] seeded: Seeded) {
    let Seeded { store, user, car } = seeded.await;
    let (mut rental, mut payment) = sample_rental(user.id(), car.id());
    store
        .create_with_payment(&rental, &payment)
        .await
        .expect("created");
    rental.mark_paid().expect("mark");
    payment
        .settle(PaymentMethod::new("card").expect("method"), ymd(2024, 1, 2))
        .expect("settle");

    store
        .commit_settlement(&rental, &payment)
        .await
        .expect("first commit");
    let error = store
        .commit_settlement(&rental, &payment)
        .await
        .expect_err("second commit");

    assert!(matches!(error, RentalRepositoryError::Stale { .. }));
}

#[rstest]
#[tokio::test]
async fn settlement_validated_before_a_reschedule_is_stale(#[future] seeded: Seeded) {
    let Seeded { store, user, car } = seeded.await;
    let (rental, mut payment) = sample_rental(user.id(), car.id());
    store
        .create_with_payment(&rental, &payment)
        .await
        .expect("created");
    let mut read_for_settlement = rental.clone();
    let mut rescheduled = rental;
    let price = Money::new(Decimal::new(200, 0)).expect("price");
    rescheduled
        .reschedule(
            RentalPeriod::new(ymd(2024, 2, 1), ymd(2024, 2, 3)).expect("period"),
            price,
        )
        .expect("reschedule");
    store.reschedule(&rescheduled).await.expect("rescheduled");
    read_for_settlement.mark_paid().expect("mark");
    payment
        .settle(PaymentMethod::new("card").expect("method"), ymd(2024, 1, 2))
        .expect("settle");

    let error = store
        .commit_settlement(&read_for_settlement, &payment)
        .await
        .expect_err("repriced rental");

    assert!(matches!(error, RentalRepositoryError::Stale { .. }));
    let stored = RentalRepository::find_by_id(&store, &rescheduled.id())
        .await
        .expect("lookup")
        .expect("rental");
    assert!(!stored.is_paid());
    assert_eq!(stored.total_price(), price);
    assert_eq!(stored.period(), rescheduled.period());
    let stored_payment = PaymentRepository::find_by_id(&store, &payment.id())
        .await
        .expect("lookup")
        .expect("payment");
    assert!(!stored_payment.is_paid());
    assert_eq!(stored_payment.amount(), price);
}

#[rstest]
#[tokio::test]
async fn settlement_commit_keeps_stored_fields(#[future] seeded: Seeded) {
    let Seeded { store, user, car } = seeded.await;
    let (mut rental, mut payment) = sample_rental(user.id(), car.id());
    store
        .create_with_payment(&rental, &payment)
        .await
        .expect("created");
    rental.mark_paid().expect("mark");
    payment
        .settle(PaymentMethod::new("cash").expect("method"), ymd(2024, 1, 2))
        .expect("settle");

    store
        .commit_settlement(&rental, &payment)
        .await
        .expect("committed");

    let stored = PaymentRepository::find_by_id(&store, &payment.id())
        .await
        .expect("lookup")
        .expect("payment");
    assert_eq!(stored, payment);
    let stored_rental = RentalRepository::find_by_id(&store, &rental.id())
        .await
        .expect("lookup")
        .expect("rental");
    assert_eq!(stored_rental, rental);
}

#[rstest]
#[tokio::test]
async fn reschedule_reprices_the_payment(#[future] seeded: Seeded) {
    let Seeded { store, user, car } = seeded.await;
    let (mut rental, payment) = sample_rental(user.id(), car.id());
    store
        .create_with_payment(&rental, &payment)
        .await
        .expect("created");
    let period = RentalPeriod::new(ymd(2024, 2, 1), ymd(2024, 2, 3)).expect("period");
    let price = Money::new(Decimal::new(200, 0)).expect("price");
    rental.reschedule(period, price).expect("reschedule");

    store.reschedule(&rental).await.expect("stored");

    let stored = PaymentRepository::find_by_id(&store, &payment.id())
        .await
        .expect("lookup")
        .expect("payment");
    assert_eq!(stored.amount(), price);
}

#[rstest]
#[tokio::test]
async fn deleting_the_payment_removes_its_rental(#[future] seeded: Seeded) {
    let Seeded { store, user, car } = seeded.await;
    let (rental, payment) = sample_rental(user.id(), car.id());
    store
        .create_with_payment(&rental, &payment)
        .await
        .expect("created");

    assert!(PaymentRepository::delete_pair(&store, &payment.id()).await.expect("delete"));

    assert!(RentalRepository::find_by_id(&store, &rental.id())
        .await
        .expect("lookup")
        .is_none());
    assert!(!PaymentRepository::delete_pair(&store, &payment.id()).await.expect("repeat"));
}

#[rstest]
#[tokio::test]
async fn referenced_user_and_car_cannot_be_deleted(#[future] seeded: Seeded) {
    let Seeded { store, user, car } = seeded.await;
    let (rental, payment) = sample_rental(user.id(), car.id());
    store
        .create_with_payment(&rental, &payment)
        .await
        .expect("created");

    let user_error = UserRepository::delete(&store, &user.id())
        .await
        .expect_err("user referenced");
    let car_error = CarRepository::delete(&store, &car.id())
        .await
        .expect_err("car referenced");

    assert!(matches!(user_error, UserRepositoryError::Referenced { .. }));
    assert!(matches!(car_error, CarRepositoryError::Referenced { .. }));
}
