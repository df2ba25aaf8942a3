//! Payment settlement service.
//!
//! Settlement moves a rental and its payment from `unpaid` to `paid` in one
//! transaction. The store applies the update only while the rental is still
//! unpaid at the price and period read here. When a concurrent settlement or
//! reschedule lands first, the commit reports `Stale` and the attempt is
//! replayed once so the caller sees the authoritative outcome, either
//! `already_paid` or `amount_mismatch`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    PaymentCommand, PaymentQuery, PaymentRepository, PaymentRepositoryError, RentalRepository,
    RentalRepositoryError, SettlePaymentRequest,
};
use crate::domain::rental_service::{already_paid, map_rental_repository_error, rental_not_found};
use crate::domain::{Error, LifecycleError, Payment, PaymentId, PaymentMethod};

/// Number of commit attempts before a lost race is reported as a conflict.
pub const SETTLEMENT_ATTEMPTS: usize = 2;

pub(crate) fn map_payment_repository_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment repository error: {message}"))
        }
    }
}

fn map_lifecycle_error(error: LifecycleError) -> Error {
    match error {
        LifecycleError::AlreadyPaid => already_paid(),
        LifecycleError::NotSettled => Error::conflict("payment has not been settled")
            .with_details(json!({ "code": "payment_not_settled" })),
    }
}

fn payment_not_found(id: &PaymentId) -> Error {
    Error::not_found(format!("payment {id} not found"))
}

enum Attempt {
    Settled(Payment),
    Stale,
}

/// Service implementing the payment command and query ports.
#[derive(Clone)]
pub struct SettlementService<R, P> {
    rentals: Arc<R>,
    payments: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<R, P> SettlementService<R, P> {
    /// Wire the service to its stores and clock.
    pub fn new(rentals: Arc<R>, payments: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rentals,
            payments,
            clock,
        }
    }
}

impl<R, P> SettlementService<R, P>
where
    R: RentalRepository,
    P: PaymentRepository,
{
    async fn attempt(&self, request: &SettlePaymentRequest) -> Result<Attempt, Error> {
        let mut rental = self
            .rentals
            .find_by_id(&request.rental_id)
            .await
            .map_err(map_rental_repository_error)?
            .ok_or_else(|| rental_not_found(&request.rental_id))?;
        if rental.is_paid() {
            return Err(already_paid());
        }
        if request.amount != rental.total_price() {
            return Err(Error::invalid_request("amount does not match the rental price")
                .with_details(json!({
                    "field": "amount",
                    "code": "amount_mismatch",
                    "expected": rental.total_price().to_string(),
                })));
        }

        let mut payment = self
            .payments
            .find_by_rental(&rental.id())
            .await
            .map_err(map_payment_repository_error)?
            .ok_or_else(|| Error::internal(format!("rental {} has no payment", rental.id())))?;

        rental.mark_paid().map_err(map_lifecycle_error)?;
        payment
            .settle(request.method.clone(), self.clock.utc())
            .map_err(map_lifecycle_error)?;

        match self.rentals.commit_settlement(&rental, &payment).await {
            Ok(()) => Ok(Attempt::Settled(payment)),
            Err(RentalRepositoryError::Stale { .. }) => Ok(Attempt::Stale),
            Err(err) => Err(map_rental_repository_error(err)),
        }
    }
}

#[async_trait]
impl<R, P> PaymentCommand for SettlementService<R, P>
where
    R: RentalRepository,
    P: PaymentRepository,
{
    async fn settle_payment(&self, request: SettlePaymentRequest) -> Result<Payment, Error> {
        for attempt in 1..=SETTLEMENT_ATTEMPTS {
            match self.attempt(&request).await? {
                Attempt::Settled(payment) => {
                    info!(
                        rental_id = %request.rental_id,
                        payment_id = %payment.id(),
                        method = %request.method,
                        "payment settled"
                    );
                    return Ok(payment);
                }
                Attempt::Stale => {
                    warn!(rental_id = %request.rental_id, attempt, "settlement lost a race");
                }
            }
        }
        Err(Error::conflict("rental changed concurrently; retry later")
            .with_details(json!({ "code": "settlement_conflict" })))
    }

    async fn update_payment_method(
        &self,
        id: &PaymentId,
        method: PaymentMethod,
    ) -> Result<Payment, Error> {
        let mut payment = self
            .payments
            .find_by_id(id)
            .await
            .map_err(map_payment_repository_error)?
            .ok_or_else(|| payment_not_found(id))?;
        payment
            .correct_method(method)
            .map_err(map_lifecycle_error)?;
        if !self
            .payments
            .update_method(&payment)
            .await
            .map_err(map_payment_repository_error)?
        {
            return Err(payment_not_found(id));
        }
        info!(payment_id = %id, "payment method corrected");
        Ok(payment)
    }

    async fn delete_payment(&self, id: &PaymentId) -> Result<(), Error> {
        if !self
            .payments
            .delete_pair(id)
            .await
            .map_err(map_payment_repository_error)?
        {
            return Err(payment_not_found(id));
        }
        info!(payment_id = %id, "payment deleted with its rental");
        Ok(())
    }
}

#[async_trait]
impl<R, P> PaymentQuery for SettlementService<R, P>
where
    R: RentalRepository,
    P: PaymentRepository,
{
    async fn get_payment(&self, id: &PaymentId) -> Result<Payment, Error> {
        self.payments
            .find_by_id(id)
            .await
            .map_err(map_payment_repository_error)?
            .ok_or_else(|| payment_not_found(id))
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, Error> {
        self.payments
            .list()
            .await
            .map_err(map_payment_repository_error)
    }
}

#[cfg(test)]
#[path = "settlement_service_tests.rs"]
mod tests;
