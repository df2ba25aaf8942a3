//! Port for car inventory persistence.
use async_trait::async_trait;

use crate::domain::{Car, CarId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by car repository adapters.
    pub enum CarRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "car repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "car repository query failed: {message}",
        /// The car is still referenced by rentals.
        Referenced { message: String } => "car is still referenced: {message}",
    }
}

/// Port for car storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Store a new car.
    async fn insert(&self, car: &Car) -> Result<(), CarRepositoryError>;

    /// Look up a car by id.
    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarRepositoryError>;

    /// All cars, oldest first.
    async fn list(&self) -> Result<Vec<Car>, CarRepositoryError>;

    /// Overwrite a stored car. Returns `false` when the id is unknown.
    async fn update(&self, car: &Car) -> Result<bool, CarRepositoryError>;

    /// Remove a car. Returns `false` when the id is unknown.
    async fn delete(&self, id: &CarId) -> Result<bool, CarRepositoryError>;
}
