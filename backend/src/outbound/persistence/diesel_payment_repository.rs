//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.
//!
//! Settlement itself is written through the rental repository so that the
//! rental and payment change together; this adapter only reads payments,
//! corrects the method of settled ones and deletes rental/payment pairs.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{Money, Payment, PaymentId, PaymentMethod, PaymentRecord, RentalId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::PaymentRow;
use super::pool::{DbPool, PoolError};
use super::schema::{payments, rentals};

/// Diesel-backed implementation of the payment repository port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Build a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PaymentRepositoryError {
    map_basic_pool_error(error, PaymentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PaymentRepositoryError {
    map_basic_diesel_error(
        error,
        PaymentRepositoryError::query,
        PaymentRepositoryError::connection,
    )
}

fn row_to_payment(row: PaymentRow) -> Result<Payment, PaymentRepositoryError> {
    let corrupt = |detail: String| {
        PaymentRepositoryError::query(format!("stored payment {} is invalid: {detail}", row.id))
    };
    let method = row
        .method
        .as_deref()
        .map(PaymentMethod::new)
        .transpose()
        .map_err(|err| corrupt(err.to_string()))?;
    Ok(Payment::from(PaymentRecord {
        id: PaymentId::from_uuid(row.id),
        rental_id: RentalId::from_uuid(row.rental_id),
        amount: Money::new(row.amount).map_err(|err| corrupt(err.to_string()))?,
        method,
        status: row
            .status
            .parse()
            .map_err(|err: crate::domain::UnknownStatus| corrupt(err.to_string()))?,
        created_at: row.created_at,
        paid_at: row.paid_at,
    }))
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = payments::table
            .filter(payments::id.eq(id.as_uuid()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_payment).transpose()
    }

    async fn find_by_rental(
        &self,
        rental_id: &RentalId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = payments::table
            .filter(payments::rental_id.eq(rental_id.as_uuid()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_payment).transpose()
    }

    async fn list(&self) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PaymentRow> = payments::table
            .order((payments::created_at.asc(), payments::id.asc()))
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_payment).collect()
    }

    async fn update_method(&self, payment: &Payment) -> Result<bool, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let method = payment.method().map(AsRef::as_ref);

        diesel::update(payments::table.filter(payments::id.eq(payment.id().as_uuid())))
            .set(payments::method.eq(method))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }

    async fn delete_pair(&self, id: &PaymentId) -> Result<bool, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let payment_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let rental_id = payments::table
                    .filter(payments::id.eq(payment_id))
                    .select(payments::rental_id)
                    .first::<uuid::Uuid>(conn)
                    .await
                    .optional()?;
                let Some(rental_id) = rental_id else {
                    return Ok(false);
                };
                diesel::delete(payments::table.filter(payments::id.eq(payment_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(rentals::table.filter(rentals::id.eq(rental_id)))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::domain::PaymentStatus;

    fn row(method: Option<&str>, status: &str) -> PaymentRow {
        PaymentRow {
            id: Uuid::new_v4(),
            rental_id: Uuid::new_v4(),
            amount: Decimal::new(300, 0),
            method: method.map(str::to_owned),
            status: status.to_owned(),
            created_at: Utc::now(),
            paid_at: None,
        }
    }

    #[rstest]
    fn unpaid_placeholder_has_no_method() {
        let payment = row_to_payment(row(None, "unpaid")).expect("valid");

        assert_eq!(payment.status(), PaymentStatus::Unpaid);
        assert!(payment.method().is_none());
        assert_eq!(payment.amount().to_string(), "300.00");
    }

    #[rstest]
    #[case(Some(""), "paid")]
    #[case(Some("card"), "void")]
    fn corrupt_row_is_a_query_error(#[case] method: Option<&str>, #[case] status: &str) {
        assert!(matches!(
            row_to_payment(row(method, status)),
            Err(PaymentRepositoryError::Query { .. })
        ));
    }
}
