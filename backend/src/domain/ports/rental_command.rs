//! Driving port for the rental lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CarId, Error, Rental, RentalId, UserId};

/// Request to book `car_id` for `user_id` between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRentalRequest {
    /// Customer the rental is booked for.
    pub user_id: UserId,
    /// Car to book; must be available.
    pub car_id: CarId,
    /// Pickup instant.
    pub start: DateTime<Utc>,
    /// Return instant; strictly after `start`.
    pub end: DateTime<Utc>,
}

/// Request to move an unpaid rental to a new period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleRentalRequest {
    /// Rental to move.
    pub rental_id: RentalId,
    /// Pickup instant.
    pub start: DateTime<Utc>,
    /// Return instant; strictly after `start`.
    pub end: DateTime<Utc>,
}

/// Domain use-case port for creating and changing rentals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalCommand: Send + Sync {
    /// Price and book a rental, creating its unpaid placeholder payment.
    async fn create_rental(&self, request: CreateRentalRequest) -> Result<Rental, Error>;

    /// Reprice an unpaid rental for a new period.
    async fn reschedule_rental(&self, request: RescheduleRentalRequest) -> Result<Rental, Error>;

    /// Delete a rental and its payment.
    async fn delete_rental(&self, id: &RentalId) -> Result<(), Error>;
}
