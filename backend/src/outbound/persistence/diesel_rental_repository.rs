//! PostgreSQL-backed `RentalRepository` implementation using Diesel ORM.
//!
//! A rental and its payment are always written in one transaction. Status
//! changes use a conditional `UPDATE ... WHERE status = 'unpaid'` so that of
//! two concurrent settlements only one observes the unpaid row; the other
//! affects zero rows and reports `Stale` without writing the payment.
//! Settlement additionally matches the total price and period it validated,
//! so a reschedule that lands between read and commit also yields `Stale`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{RentalRepository, RentalRepositoryError};
use crate::domain::{
    CarId, Money, Payment, Rental, RentalId, RentalPeriod, RentalStatus, UnknownStatus, UserId,
};

use super::diesel_basic_error_mapping::{
    Violation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewPaymentRow, NewRentalRow, RentalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{payments, rentals};

const UNPAID: &str = "unpaid";

/// Diesel-backed implementation of the rental repository port.
#[derive(Clone)]
pub struct DieselRentalRepository {
    pool: DbPool,
}

impl DieselRentalRepository {
    /// Build a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RentalRepositoryError {
    map_basic_pool_error(error, RentalRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RentalRepositoryError {
    map_basic_diesel_error(
        error,
        RentalRepositoryError::query,
        RentalRepositoryError::connection,
    )
}

/// Aborts a settlement transaction, rolling back any partial write.
#[derive(Debug)]
enum CommitFailure {
    /// The stored rows no longer match what the caller validated.
    Changed,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for CommitFailure {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

fn stale(rental: &Rental) -> RentalRepositoryError {
    RentalRepositoryError::stale(rental.id().to_string())
}

fn row_to_rental(row: RentalRow) -> Result<Rental, RentalRepositoryError> {
    let corrupt = |detail: String| {
        RentalRepositoryError::query(format!("stored rental {} is invalid: {detail}", row.id))
    };
    let period = RentalPeriod::new(row.start_date, row.end_date)
        .map_err(|err| corrupt(err.to_string()))?;
    let total_price = Money::new(row.total_price).map_err(|err| corrupt(err.to_string()))?;
    let status: RentalStatus = row
        .status
        .parse()
        .map_err(|err: UnknownStatus| corrupt(err.to_string()))?;
    Ok(Rental::restore(
        RentalId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        CarId::from_uuid(row.car_id),
        period,
        total_price,
        status,
        row.created_at,
    ))
}

#[async_trait]
impl RentalRepository for DieselRentalRepository {
    async fn create_with_payment(
        &self,
        rental: &Rental,
        payment: &Payment,
    ) -> Result<(), RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rental_row = NewRentalRow {
            id: *rental.id().as_uuid(),
            user_id: *rental.user_id().as_uuid(),
            car_id: *rental.car_id().as_uuid(),
            start_date: rental.period().start(),
            end_date: rental.period().end(),
            total_price: rental.total_price().amount(),
            status: rental.status().as_str(),
            created_at: rental.created_at(),
        };
        let payment_row = NewPaymentRow {
            id: *payment.id().as_uuid(),
            rental_id: *payment.rental_id().as_uuid(),
            amount: payment.amount().amount(),
            method: payment.method().map(AsRef::as_ref),
            status: payment.status().as_str(),
            created_at: payment.created_at(),
            paid_at: payment.paid_at(),
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(rentals::table)
                    .values(&rental_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(payments::table)
                    .values(&payment_row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match constraint_violation(&err) {
            Some(Violation::ForeignKey) => RentalRepositoryError::missing_reference(format!(
                "user {} or car {}",
                rental.user_id(),
                rental.car_id()
            )),
            _ => map_diesel_error(err),
        })
    }

    async fn find_by_id(&self, id: &RentalId) -> Result<Option<Rental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = rentals::table
            .filter(rentals::id.eq(id.as_uuid()))
            .select(RentalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_rental).transpose()
    }

    async fn list(&self) -> Result<Vec<Rental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RentalRow> = rentals::table
            .order((rentals::created_at.asc(), rentals::id.asc()))
            .select(RentalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_rental).collect()
    }

    async fn reschedule(&self, rental: &Rental) -> Result<(), RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rental_id = *rental.id().as_uuid();
        let period = rental.period();
        let total_price = rental.total_price().amount();

        let updated = conn
            .transaction(|conn| {
                async move {
                    let affected = diesel::update(
                        rentals::table
                            .filter(rentals::id.eq(rental_id))
                            .filter(rentals::status.eq(UNPAID)),
                    )
                    .set((
                        rentals::start_date.eq(period.start()),
                        rentals::end_date.eq(period.end()),
                        rentals::total_price.eq(total_price),
                    ))
                    .execute(conn)
                    .await?;
                    if affected == 0 {
                        return Ok(false);
                    }
                    diesel::update(payments::table.filter(payments::rental_id.eq(rental_id)))
                        .set(payments::amount.eq(total_price))
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if updated { Ok(()) } else { Err(stale(rental)) }
    }

    async fn commit_settlement(
        &self,
        rental: &Rental,
        payment: &Payment,
    ) -> Result<(), RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rental_id = *rental.id().as_uuid();
        let payment_id = *payment.id().as_uuid();
        let period = rental.period();
        let total_price = rental.total_price().amount();
        let rental_status = rental.status().as_str();
        let payment_status = payment.status().as_str();
        let method = payment.method().map(|method| method.as_ref().to_owned());
        let paid_at = payment.paid_at();

        let committed = conn
            .transaction(|conn| {
                async move {
                    let affected = diesel::update(
                        rentals::table
                            .filter(rentals::id.eq(rental_id))
                            .filter(rentals::status.eq(UNPAID))
                            .filter(rentals::total_price.eq(total_price))
                            .filter(rentals::start_date.eq(period.start()))
                            .filter(rentals::end_date.eq(period.end())),
                    )
                    .set(rentals::status.eq(rental_status))
                    .execute(conn)
                    .await?;
                    if affected == 0 {
                        return Err(CommitFailure::Changed);
                    }
                    let affected = diesel::update(
                        payments::table
                            .filter(payments::id.eq(payment_id))
                            .filter(payments::rental_id.eq(rental_id))
                            .filter(payments::status.eq(UNPAID))
                            .filter(payments::amount.eq(total_price)),
                    )
                    .set((
                        payments::status.eq(payment_status),
                        payments::method.eq(method),
                        payments::paid_at.eq(paid_at),
                    ))
                    .execute(conn)
                    .await?;
                    if affected == 0 {
                        return Err(CommitFailure::Changed);
                    }
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        match committed {
            Ok(()) => Ok(()),
            Err(CommitFailure::Changed) => {
                debug!(rental_id = %rental.id(), "settlement commit found rental changed");
                Err(stale(rental))
            }
            Err(CommitFailure::Diesel(err)) => Err(map_diesel_error(err)),
        }
    }

    async fn delete_pair(&self, id: &RentalId) -> Result<bool, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rental_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                diesel::delete(payments::table.filter(payments::rental_id.eq(rental_id)))
                    .execute(conn)
                    .await?;
                let affected = diesel::delete(rentals::table.filter(rentals::id.eq(rental_id)))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(affected > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
