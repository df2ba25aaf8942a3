//! Process-local record store.
//!
//! [`InMemoryStore`] implements every repository port over four tables held
//! behind a single `tokio::sync::Mutex`. Holding one lock for each operation
//! gives the same all-or-nothing behaviour as the PostgreSQL transactions:
//! a rental and its payment are inserted together, and a settlement commit
//! only lands while the rental is still unpaid at the price and period the
//! caller validated. Settlement flips the stored status fields in place.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{
    CarRepository, CarRepositoryError, PaymentRepository, PaymentRepositoryError,
    RentalRepository, RentalRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{Car, CarId, Payment, PaymentId, Rental, RentalId, User, UserId};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    cars: HashMap<CarId, Car>,
    rentals: HashMap<RentalId, Rental>,
    payments: HashMap<PaymentId, Payment>,
}

impl Tables {
    fn payment_for(&self, rental_id: RentalId) -> Option<&Payment> {
        self.payments
            .values()
            .find(|payment| payment.rental_id() == rental_id)
    }

    fn remove_pair(&mut self, rental_id: RentalId) {
        self.rentals.remove(&rental_id);
        self.payments
            .retain(|_, payment| payment.rental_id() != rental_id);
    }
}

/// Shared in-memory tables implementing the user, car, rental and payment
/// repositories. Clones share the same tables.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Snapshot rows ordered by creation time, oldest first.
fn ordered<T, K>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T>
where
    K: Ord,
{
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(key);
    rows
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables
            .users
            .values()
            .any(|existing| existing.email() == user.email())
        {
            return Err(UserRepositoryError::duplicate_email(user.email().as_ref()));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.tables.lock().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email().as_ref() == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(ordered(tables.users.values().cloned(), |user| {
            (user.created_at(), *user.id().as_uuid())
        }))
    }

    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&user.id()) {
            return Ok(false);
        }
        if tables
            .users
            .values()
            .any(|other| other.id() != user.id() && other.email() == user.email())
        {
            return Err(UserRepositoryError::duplicate_email(user.email().as_ref()));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.rentals.values().any(|rental| rental.user_id() == *id) {
            return Err(UserRepositoryError::referenced(format!(
                "user {id} has rentals"
            )));
        }
        Ok(tables.users.remove(id).is_some())
    }
}

#[async_trait]
impl CarRepository for InMemoryStore {
    async fn insert(&self, car: &Car) -> Result<(), CarRepositoryError> {
        self.tables.lock().await.cars.insert(car.id(), car.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarRepositoryError> {
        Ok(self.tables.lock().await.cars.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Car>, CarRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(ordered(tables.cars.values().cloned(), |car| {
            (car.created_at(), *car.id().as_uuid())
        }))
    }

    async fn update(&self, car: &Car) -> Result<bool, CarRepositoryError> {
        let mut tables = self.tables.lock().await;
        match tables.cars.get_mut(&car.id()) {
            Some(stored) => {
                *stored = car.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &CarId) -> Result<bool, CarRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.rentals.values().any(|rental| rental.car_id() == *id) {
            return Err(CarRepositoryError::referenced(format!("car {id} has rentals")));
        }
        Ok(tables.cars.remove(id).is_some())
    }
}

#[async_trait]
impl RentalRepository for InMemoryStore {
    async fn create_with_payment(
        &self,
        rental: &Rental,
        payment: &Payment,
    ) -> Result<(), RentalRepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&rental.user_id()) {
            return Err(RentalRepositoryError::missing_reference(format!(
                "user {}",
                rental.user_id()
            )));
        }
        if !tables.cars.contains_key(&rental.car_id()) {
            return Err(RentalRepositoryError::missing_reference(format!(
                "car {}",
                rental.car_id()
            )));
        }
        if tables.rentals.contains_key(&rental.id()) || tables.payment_for(rental.id()).is_some()
        {
            return Err(RentalRepositoryError::query(format!(
                "rental {} already exists",
                rental.id()
            )));
        }
        tables.rentals.insert(rental.id(), rental.clone());
        tables.payments.insert(payment.id(), payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RentalId) -> Result<Option<Rental>, RentalRepositoryError> {
        Ok(self.tables.lock().await.rentals.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Rental>, RentalRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(ordered(tables.rentals.values().cloned(), |rental| {
            (rental.created_at(), *rental.id().as_uuid())
        }))
    }

    async fn reschedule(&self, rental: &Rental) -> Result<(), RentalRepositoryError> {
        let mut tables = self.tables.lock().await;
        let stale = || RentalRepositoryError::stale(rental.id().to_string());
        match tables.rentals.get(&rental.id()) {
            Some(stored) if !stored.is_paid() => {}
            _ => return Err(stale()),
        }
        let payment_id = tables
            .payment_for(rental.id())
            .map(Payment::id)
            .ok_or_else(stale)?;
        if let Some(payment) = tables.payments.get_mut(&payment_id) {
            payment.reprice(rental.total_price()).map_err(|_| stale())?;
        }
        tables.rentals.insert(rental.id(), rental.clone());
        Ok(())
    }

    async fn commit_settlement(
        &self,
        rental: &Rental,
        payment: &Payment,
    ) -> Result<(), RentalRepositoryError> {
        let (Some(method), Some(paid_at)) = (payment.method().cloned(), payment.paid_at()) else {
            return Err(RentalRepositoryError::query(format!(
                "payment {} is not settled",
                payment.id()
            )));
        };
        let stale = || RentalRepositoryError::stale(rental.id().to_string());
        let mut tables = self.tables.lock().await;
        let rental_matches = tables.rentals.get(&rental.id()).is_some_and(|stored| {
            !stored.is_paid()
                && stored.total_price() == rental.total_price()
                && stored.period() == rental.period()
        });
        let payment_matches = tables.payments.get(&payment.id()).is_some_and(|stored| {
            !stored.is_paid()
                && stored.rental_id() == rental.id()
                && stored.amount() == rental.total_price()
        });
        if !(rental_matches && payment_matches) {
            return Err(stale());
        }

        if let Some(stored) = tables.rentals.get_mut(&rental.id()) {
            stored.mark_paid().map_err(|_| stale())?;
        }
        if let Some(stored) = tables.payments.get_mut(&payment.id()) {
            stored.settle(method, paid_at).map_err(|_| stale())?;
        }
        Ok(())
    }

    async fn delete_pair(&self, id: &RentalId) -> Result<bool, RentalRepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.rentals.contains_key(id) {
            return Ok(false);
        }
        tables.remove_pair(*id);
        Ok(true)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentRepositoryError> {
        Ok(self.tables.lock().await.payments.get(id).cloned())
    }

    async fn find_by_rental(
        &self,
        rental_id: &RentalId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        Ok(self.tables.lock().await.payment_for(*rental_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(ordered(tables.payments.values().cloned(), |payment| {
            (payment.created_at(), *payment.id().as_uuid())
        }))
    }

    async fn update_method(&self, payment: &Payment) -> Result<bool, PaymentRepositoryError> {
        let mut tables = self.tables.lock().await;
        match tables.payments.get_mut(&payment.id()) {
            Some(stored) => {
                *stored = payment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_pair(&self, id: &PaymentId) -> Result<bool, PaymentRepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(rental_id) = tables.payments.get(id).map(Payment::rental_id) else {
            return Ok(false);
        };
        tables.remove_pair(rental_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
