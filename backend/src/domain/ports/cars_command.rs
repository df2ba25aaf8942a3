//! Driving port for maintaining the car inventory.

use async_trait::async_trait;

use crate::domain::{Car, CarChanges, CarDraft, CarId, Error};

/// Domain use-case port for changing the fleet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarsCommand: Send + Sync {
    /// Add a car to the fleet.
    async fn add_car(&self, draft: CarDraft) -> Result<Car, Error>;

    /// Apply a partial update. Prices of existing rentals are not touched.
    async fn update_car(&self, id: &CarId, changes: CarChanges) -> Result<Car, Error>;

    /// Remove a car; `Conflict` while rentals still reference it.
    async fn delete_car(&self, id: &CarId) -> Result<(), Error>;
}
