//! Driving port for settling payments.

use async_trait::async_trait;

use crate::domain::{Error, Money, Payment, PaymentId, PaymentMethod, RentalId};

/// Request to settle the payment of `rental_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlePaymentRequest {
    /// Rental being paid for.
    pub rental_id: RentalId,
    /// How the customer paid.
    pub method: PaymentMethod,
    /// Must equal the rental's total price.
    pub amount: Money,
}

/// Domain use-case port for payment mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Mark a rental and its payment as paid.
    async fn settle_payment(&self, request: SettlePaymentRequest) -> Result<Payment, Error>;

    /// Correct the method recorded on a settled payment.
    async fn update_payment_method(
        &self,
        id: &PaymentId,
        method: PaymentMethod,
    ) -> Result<Payment, Error>;

    /// Delete a payment and its rental.
    async fn delete_payment(&self, id: &PaymentId) -> Result<(), Error>;
}
