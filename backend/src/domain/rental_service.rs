//! Rental lifecycle service.
//!
//! Creating a rental validates the period, confirms that the user and car
//! exist, prices the booking from the car's current daily rate and writes the
//! rental together with its unpaid placeholder payment in one transaction.
//! Nothing is written when any step fails.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::account_service::map_user_repository_error;
use crate::domain::car_service::map_car_repository_error;
use crate::domain::ports::{
    CarRepository, CreateRentalRequest, RentalCommand, RentalQuery, RentalRepository,
    RentalRepositoryError, RescheduleRentalRequest, UserRepository,
};
use crate::domain::{
    Car, CarId, Error, Payment, PaymentId, PricingError, Rental, RentalId, RentalPeriod, UserId,
};

pub(crate) fn map_rental_repository_error(error: RentalRepositoryError) -> Error {
    match error {
        RentalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rental repository unavailable: {message}"))
        }
        RentalRepositoryError::Query { message } => {
            Error::internal(format!("rental repository error: {message}"))
        }
        RentalRepositoryError::MissingReference { message } => {
            Error::not_found(format!("rental reference missing: {message}"))
        }
        RentalRepositoryError::Stale { rental_id } => {
            Error::conflict(format!("rental {rental_id} changed concurrently"))
                .with_details(json!({ "code": "stale_rental" }))
        }
    }
}

pub(crate) fn map_pricing_error(error: PricingError) -> Error {
    match error {
        PricingError::InvalidDateRange => Error::invalid_request("end date must be after start date")
            .with_details(json!({ "field": "endDate", "code": "invalid_date_range" })),
        PricingError::Overflow => Error::invalid_request("rental price is too large")
            .with_details(json!({ "code": "price_overflow" })),
    }
}

pub(crate) fn rental_not_found(id: &RentalId) -> Error {
    Error::not_found(format!("rental {id} not found"))
}

pub(crate) fn already_paid() -> Error {
    Error::conflict("rental already paid").with_details(json!({ "code": "already_paid" }))
}

/// Service implementing the rental command and query ports.
#[derive(Clone)]
pub struct RentalService<U, C, R> {
    users: Arc<U>,
    cars: Arc<C>,
    rentals: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<U, C, R> RentalService<U, C, R> {
    /// Wire the service to its stores and clock.
    pub fn new(users: Arc<U>, cars: Arc<C>, rentals: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            cars,
            rentals,
            clock,
        }
    }
}

impl<U, C, R> RentalService<U, C, R>
where
    U: UserRepository,
    C: CarRepository,
    R: RentalRepository,
{
    async fn require_user(&self, id: &UserId) -> Result<(), Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .map(|_| ())
            .ok_or_else(|| {
                Error::not_found(format!("user {id} not found"))
                    .with_details(json!({ "field": "userId", "code": "user_not_found" }))
            })
    }

    async fn require_car(&self, id: &CarId) -> Result<Car, Error> {
        self.cars
            .find_by_id(id)
            .await
            .map_err(map_car_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("car {id} not found"))
                    .with_details(json!({ "field": "carId", "code": "car_not_found" }))
            })
    }

    async fn load(&self, id: &RentalId) -> Result<Rental, Error> {
        self.rentals
            .find_by_id(id)
            .await
            .map_err(map_rental_repository_error)?
            .ok_or_else(|| rental_not_found(id))
    }
}

#[async_trait]
impl<U, C, R> RentalCommand for RentalService<U, C, R>
where
    U: UserRepository,
    C: CarRepository,
    R: RentalRepository,
{
    async fn create_rental(&self, request: CreateRentalRequest) -> Result<Rental, Error> {
        let period = RentalPeriod::new(request.start, request.end).map_err(map_pricing_error)?;
        self.require_user(&request.user_id).await?;
        let car = self.require_car(&request.car_id).await?;
        let total_price = period
            .price(car.price_per_day())
            .map_err(map_pricing_error)?;

        let now = self.clock.utc();
        let rental = Rental::new(
            RentalId::random(),
            request.user_id,
            car.id(),
            period,
            total_price,
            now,
        );
        let payment = Payment::placeholder(PaymentId::random(), rental.id(), total_price, now);

        self.rentals
            .create_with_payment(&rental, &payment)
            .await
            .map_err(|err| {
                error!(error = %err, rental_id = %rental.id(), "rental insert failed");
                map_rental_repository_error(err)
            })?;
        info!(
            rental_id = %rental.id(),
            payment_id = %payment.id(),
            total_price = %total_price,
            "rental created"
        );
        Ok(rental)
    }

    async fn reschedule_rental(&self, request: RescheduleRentalRequest) -> Result<Rental, Error> {
        let period = RentalPeriod::new(request.start, request.end).map_err(map_pricing_error)?;
        let mut rental = self.load(&request.rental_id).await?;
        if rental.is_paid() {
            return Err(already_paid());
        }

        let car = self.require_car(&rental.car_id()).await?;
        let total_price = period
            .price(car.price_per_day())
            .map_err(map_pricing_error)?;
        rental
            .reschedule(period, total_price)
            .map_err(|_| already_paid())?;

        match self.rentals.reschedule(&rental).await {
            Ok(()) => {}
            Err(RentalRepositoryError::Stale { .. }) => return Err(already_paid()),
            Err(err) => return Err(map_rental_repository_error(err)),
        }
        info!(rental_id = %rental.id(), total_price = %total_price, "rental rescheduled");
        Ok(rental)
    }

    async fn delete_rental(&self, id: &RentalId) -> Result<(), Error> {
        if !self
            .rentals
            .delete_pair(id)
            .await
            .map_err(map_rental_repository_error)?
        {
            return Err(rental_not_found(id));
        }
        info!(rental_id = %id, "rental deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, C, R> RentalQuery for RentalService<U, C, R>
where
    U: UserRepository,
    C: CarRepository,
    R: RentalRepository,
{
    async fn get_rental(&self, id: &RentalId) -> Result<Rental, Error> {
        self.load(id).await
    }

    async fn list_rentals(&self) -> Result<Vec<Rental>, Error> {
        self.rentals.list().await.map_err(map_rental_repository_error)
    }
}

#[cfg(test)]
#[path = "rental_service_tests.rs"]
mod tests;
