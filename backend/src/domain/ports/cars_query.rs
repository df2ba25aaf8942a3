//! Driving port for reading the car inventory.

use async_trait::async_trait;

use crate::domain::{Car, CarId, Error};

/// Domain use-case port for reading the fleet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarsQuery: Send + Sync {
    /// Every car in the fleet.
    async fn list_cars(&self) -> Result<Vec<Car>, Error>;

    /// A single car; `NotFound` when absent.
    async fn get_car(&self, id: &CarId) -> Result<Car, Error>;
}
