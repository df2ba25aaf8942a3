//! Fleet handlers.
//!
//! ```text
//! POST /cars {"brand":"Toyota","model":"Corolla","year":2020,"licensePlate":"AB-123","pricePerDay":"100.00"}
//! PUT /cars/{id} {"pricePerDay":"120"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Car, CarChanges, CarDraft, CarId, CarValidationError, RawCarChanges};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{CarSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_car_validation_error, parse_id};

/// Body for `POST /cars`. Status defaults to `available`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarRequest {
    /// Manufacturer.
    #[schema(example = "Toyota")]
    pub brand: String,
    /// Model name.
    #[schema(example = "Corolla")]
    pub model: String,
    /// Model year.
    #[schema(example = 2020)]
    pub year: i32,
    /// Registration plate.
    #[schema(example = "AB-123")]
    pub license_plate: String,
    /// Daily rate; must be positive.
    #[schema(value_type = String, example = "100.00")]
    pub price_per_day: Decimal,
    /// `available`, `rented` or `maintenance`.
    #[schema(example = "available")]
    pub status: Option<String>,
}

impl TryFrom<CarRequest> for CarDraft {
    type Error = CarValidationError;

    fn try_from(value: CarRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.brand,
            &value.model,
            value.year,
            &value.license_plate,
            value.price_per_day,
            value.status.as_deref(),
        )
    }
}

/// Body for `PUT /cars/{id}`. Absent fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    /// New manufacturer.
    pub brand: Option<String>,
    /// New model name.
    pub model: Option<String>,
    /// New model year.
    pub year: Option<i32>,
    /// New registration plate.
    pub license_plate: Option<String>,
    /// New daily rate.
    #[schema(value_type = Option<String>)]
    pub price_per_day: Option<Decimal>,
    /// `available`, `rented` or `maintenance`.
    pub status: Option<String>,
}

impl UpdateCarRequest {
    fn as_raw(&self) -> RawCarChanges<'_> {
        RawCarChanges {
            brand: self.brand.as_deref(),
            model: self.model.as_deref(),
            year: self.year,
            license_plate: self.license_plate.as_deref(),
            price_per_day: self.price_per_day,
            status: self.status.as_deref(),
        }
    }
}

fn car_id(raw: &str) -> ApiResult<CarId> {
    parse_id(raw, FieldName::new("id"))
}

/// List the fleet.
#[utoipa::path(
    get,
    path = "/cars",
    responses(
        (status = 200, description = "Cars", body = [CarSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "listCars"
)]
#[get("/cars")]
pub async fn list_cars(
    _auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Car>>> {
    Ok(web::Json(state.cars_query.list_cars().await?))
}

/// Fetch one car.
#[utoipa::path(
    get,
    path = "/cars/{id}",
    params(("id" = String, Path, description = "Car identifier")),
    responses(
        (status = 200, description = "Car", body = CarSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "getCar"
)]
#[get("/cars/{id}")]
pub async fn get_car(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Car>> {
    let id = car_id(&path)?;
    Ok(web::Json(state.cars_query.get_car(&id).await?))
}

/// Add a car to the fleet.
#[utoipa::path(
    post,
    path = "/cars",
    request_body = CarRequest,
    responses(
        (status = 200, description = "Car added", body = CarSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "addCar"
)]
#[post("/cars")]
pub async fn add_car(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<CarRequest>,
) -> ApiResult<web::Json<Car>> {
    let draft = CarDraft::try_from(payload.into_inner()).map_err(map_car_validation_error)?;
    Ok(web::Json(state.cars_command.add_car(draft).await?))
}

/// Update a car. Existing rentals keep the price they were booked at.
#[utoipa::path(
    put,
    path = "/cars/{id}",
    params(("id" = String, Path, description = "Car identifier")),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Updated car", body = CarSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "updateCar"
)]
#[put("/cars/{id}")]
pub async fn update_car(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateCarRequest>,
) -> ApiResult<web::Json<Car>> {
    let id = car_id(&path)?;
    let changes = CarChanges::try_from(payload.as_raw()).map_err(map_car_validation_error)?;
    Ok(web::Json(state.cars_command.update_car(&id, changes).await?))
}

/// Remove a car. Cars referenced by rentals cannot be removed.
#[utoipa::path(
    delete,
    path = "/cars/{id}",
    params(("id" = String, Path, description = "Car identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid identifier or car has rentals", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "deleteCar"
)]
#[delete("/cars/{id}")]
pub async fn delete_car(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = car_id(&path)?;
    state.cars_command.delete_car(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
