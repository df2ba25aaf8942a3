//! PostgreSQL-backed `CarRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CarRepository, CarRepositoryError};
use crate::domain::{Car, CarDraft, CarId};

use super::diesel_basic_error_mapping::{
    Violation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CarRow, CarUpdate, NewCarRow};
use super::pool::{DbPool, PoolError};
use super::schema::cars;

/// Diesel-backed implementation of the car repository port.
#[derive(Clone)]
pub struct DieselCarRepository {
    pool: DbPool,
}

impl DieselCarRepository {
    /// Build a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CarRepositoryError {
    map_basic_pool_error(error, CarRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CarRepositoryError {
    map_basic_diesel_error(
        error,
        CarRepositoryError::query,
        CarRepositoryError::connection,
    )
}

fn row_to_car(row: CarRow) -> Result<Car, CarRepositoryError> {
    let draft = CarDraft::try_from_parts(
        &row.brand,
        &row.model,
        row.year,
        &row.license_plate,
        row.price_per_day,
        Some(row.status.as_str()),
    )
    .map_err(|err| CarRepositoryError::query(format!("stored car {} is invalid: {err}", row.id)))?;
    Ok(Car::new(CarId::from_uuid(row.id), draft, row.created_at))
}

#[async_trait]
impl CarRepository for DieselCarRepository {
    async fn insert(&self, car: &Car) -> Result<(), CarRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCarRow {
            id: *car.id().as_uuid(),
            brand: car.brand(),
            model: car.model(),
            year: car.year(),
            license_plate: car.license_plate(),
            price_per_day: car.price_per_day().amount(),
            status: car.status().as_str(),
            created_at: car.created_at(),
        };

        diesel::insert_into(cars::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = cars::table
            .filter(cars::id.eq(id.as_uuid()))
            .select(CarRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_car).transpose()
    }

    async fn list(&self) -> Result<Vec<Car>, CarRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CarRow> = cars::table
            .order((cars::created_at.asc(), cars::id.asc()))
            .select(CarRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_car).collect()
    }

    async fn update(&self, car: &Car) -> Result<bool, CarRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CarUpdate {
            brand: car.brand(),
            model: car.model(),
            year: car.year(),
            license_plate: car.license_plate(),
            price_per_day: car.price_per_day().amount(),
            status: car.status().as_str(),
        };

        diesel::update(cars::table.filter(cars::id.eq(car.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &CarId) -> Result<bool, CarRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(cars::table.filter(cars::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(|err| match constraint_violation(&err) {
                Some(Violation::ForeignKey) => {
                    CarRepositoryError::referenced(format!("car {id} has rentals"))
                }
                _ => map_diesel_error(err),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::domain::CarStatus;

    fn row(rate: Decimal, status: &str) -> CarRow {
        CarRow {
            id: Uuid::new_v4(),
            brand: "Toyota".to_owned(),
            model: "Corolla".to_owned(),
            year: 2020,
            license_plate: "AB-123".to_owned(),
            price_per_day: rate,
            status: status.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_row_becomes_car() {
        let car = row_to_car(row(Decimal::new(4550, 2), "maintenance")).expect("valid");

        assert_eq!(car.status(), CarStatus::Maintenance);
        assert_eq!(car.price_per_day().amount(), Decimal::new(4550, 2));
    }

    #[rstest]
    #[case(Decimal::ZERO, "available")]
    #[case(Decimal::ONE, "scrapped")]
    fn corrupt_row_is_a_query_error(#[case] rate: Decimal, #[case] status: &str) {
        assert!(matches!(
            row_to_car(row(rate, status)),
            Err(CarRepositoryError::Query { .. })
        ));
    }
}
