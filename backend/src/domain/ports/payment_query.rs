//! Driving port for payment reads.

use async_trait::async_trait;

use crate::domain::{Error, Payment, PaymentId};

/// Driving port for reading payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentQuery: Send + Sync {
    /// A single payment; `NotFound` when absent.
    async fn get_payment(&self, id: &PaymentId) -> Result<Payment, Error>;

    /// Every payment, oldest first.
    async fn list_payments(&self) -> Result<Vec<Payment>, Error>;
}
