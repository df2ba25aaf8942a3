//! Driving port for rental reads.

use async_trait::async_trait;

use crate::domain::{Error, Rental, RentalId};

/// Driving port for reading rentals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalQuery: Send + Sync {
    /// A single rental; `NotFound` when absent.
    async fn get_rental(&self, id: &RentalId) -> Result<Rental, Error>;

    /// Every rental, oldest first.
    async fn list_rentals(&self) -> Result<Vec<Rental>, Error>;
}
