//! Port for payment reads and post-settlement corrections.
use async_trait::async_trait;

use crate::domain::{Payment, PaymentId, RentalId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "payment repository query failed: {message}",
    }
}

/// Port for reading and correcting stored payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Look up a payment by id.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// The single payment belonging to a rental.
    async fn find_by_rental(
        &self,
        rental_id: &RentalId,
    ) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// All payments, oldest first.
    async fn list(&self) -> Result<Vec<Payment>, PaymentRepositoryError>;

    /// Persist a corrected method. Returns `false` when the id is unknown.
    async fn update_method(&self, payment: &Payment) -> Result<bool, PaymentRepositoryError>;

    /// Delete a payment together with its rental. Returns `false` when absent.
    async fn delete_pair(&self, id: &PaymentId) -> Result<bool, PaymentRepositoryError>;
}
