//! Port for rental persistence.
//!
//! A rental and its payment are always written together. Adapters must run
//! each multi-record method in a single transaction so that a rental is never
//! visible without its payment, and a settlement never half-applies.

use async_trait::async_trait;

use crate::domain::{Payment, Rental, RentalId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rental repository adapters.
    pub enum RentalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "rental repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rental repository query failed: {message}",
        /// The referenced user or car disappeared before the insert.
        MissingReference { message: String } => "rental reference missing: {message}",
        /// The stored rental changed (paid or repriced) since it was read.
        Stale { rental_id: String } => "rental {rental_id} changed since it was read",
    }
}

/// Port for rental storage; rentals and payments are written as pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Insert a rental and its placeholder payment atomically.
    async fn create_with_payment(
        &self,
        rental: &Rental,
        payment: &Payment,
    ) -> Result<(), RentalRepositoryError>;

    /// Look up a rental by id.
    async fn find_by_id(&self, id: &RentalId) -> Result<Option<Rental>, RentalRepositoryError>;

    /// All rentals, oldest first.
    async fn list(&self) -> Result<Vec<Rental>, RentalRepositoryError>;

    /// Persist a new period and price on an unpaid rental, copying the new
    /// price onto its payment.
    ///
    /// Fails with `Stale` when the stored rental is missing or already paid.
    async fn reschedule(&self, rental: &Rental) -> Result<(), RentalRepositoryError>;

    /// Persist a settled rental and payment.
    ///
    /// Only the status, method and payment time are written, and only while
    /// the stored rental is still `unpaid` with the same total price and
    /// period as `rental`. Otherwise nothing is written and `Stale` is
    /// returned, so a concurrent reschedule is never overwritten.
    async fn commit_settlement(
        &self,
        rental: &Rental,
        payment: &Payment,
    ) -> Result<(), RentalRepositoryError>;

    /// Delete a rental together with its payment. Returns `false` when absent.
    async fn delete_pair(&self, id: &RentalId) -> Result<bool, RentalRepositoryError>;
}
