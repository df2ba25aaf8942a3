//! Car inventory service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{CarRepository, CarRepositoryError, CarsCommand, CarsQuery};
use crate::domain::{Car, CarChanges, CarDraft, CarId, Error};

pub(crate) fn map_car_repository_error(error: CarRepositoryError) -> Error {
    match error {
        CarRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("car repository unavailable: {message}"))
        }
        CarRepositoryError::Query { message } => {
            Error::internal(format!("car repository error: {message}"))
        }
        CarRepositoryError::Referenced { .. } => {
            Error::conflict("car still has rentals").with_details(json!({ "code": "car_has_rentals" }))
        }
    }
}

fn car_not_found(id: &CarId) -> Error {
    Error::not_found(format!("car {id} not found"))
}

/// Service implementing the car query and command ports.
#[derive(Clone)]
pub struct CarService<C> {
    cars: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CarService<C> {
    /// Wire the service to a car store.
    pub fn new(cars: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { cars, clock }
    }
}

impl<C: CarRepository> CarService<C> {
    async fn load(&self, id: &CarId) -> Result<Car, Error> {
        self.cars
            .find_by_id(id)
            .await
            .map_err(map_car_repository_error)?
            .ok_or_else(|| car_not_found(id))
    }
}

#[async_trait]
impl<C: CarRepository> CarsQuery for CarService<C> {
    async fn list_cars(&self) -> Result<Vec<Car>, Error> {
        self.cars.list().await.map_err(map_car_repository_error)
    }

    async fn get_car(&self, id: &CarId) -> Result<Car, Error> {
        self.load(id).await
    }
}

#[async_trait]
impl<C: CarRepository> CarsCommand for CarService<C> {
    async fn add_car(&self, draft: CarDraft) -> Result<Car, Error> {
        let car = Car::new(CarId::random(), draft, self.clock.utc());
        self.cars
            .insert(&car)
            .await
            .map_err(map_car_repository_error)?;
        info!(car_id = %car.id(), rate = %car.price_per_day(), "car added");
        Ok(car)
    }

    async fn update_car(&self, id: &CarId, changes: CarChanges) -> Result<Car, Error> {
        let mut car = self.load(id).await?;
        car.apply(changes);
        if !self
            .cars
            .update(&car)
            .await
            .map_err(map_car_repository_error)?
        {
            return Err(car_not_found(id));
        }
        info!(car_id = %id, "car updated");
        Ok(car)
    }

    async fn delete_car(&self, id: &CarId) -> Result<(), Error> {
        if !self
            .cars
            .delete(id)
            .await
            .map_err(map_car_repository_error)?
        {
            return Err(car_not_found(id));
        }
        info!(car_id = %id, "car deleted");
        Ok(())
    }
}
