//! Rental handlers.
//!
//! Dates are RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
//! The rental is priced from the car's current daily rate and created with
//! an unpaid placeholder payment.
//!
//! ```text
//! POST /rentals {"carId":"…","startDate":"2024-01-01","endDate":"2024-01-04"}
//! PUT /rentals/{id} {"startDate":"2024-02-01","endDate":"2024-02-03"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CreateRentalRequest, RescheduleRentalRequest};
use crate::domain::{CarId, Rental, RentalId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, RentalSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_instant, require};

const USER_ID: FieldName = FieldName::new("userId");
const CAR_ID: FieldName = FieldName::new("carId");
const START_DATE: FieldName = FieldName::new("startDate");
const END_DATE: FieldName = FieldName::new("endDate");

/// Body for `POST /rentals`. `userId` defaults to the caller.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalRequest {
    /// Customer to book for.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: Option<String>,
    /// Car to book.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub car_id: Option<String>,
    /// Pickup as a `YYYY-MM-DD` date or RFC 3339 timestamp.
    #[schema(example = "2024-01-01")]
    pub start_date: Option<String>,
    /// Return as a `YYYY-MM-DD` date or RFC 3339 timestamp.
    #[schema(example = "2024-01-04")]
    pub end_date: Option<String>,
}

impl RentalRequest {
    fn into_command(self, caller: UserId) -> ApiResult<CreateRentalRequest> {
        let user_id = match self.user_id.as_deref() {
            Some(raw) => parse_id::<UserId>(raw, USER_ID)?,
            None => caller,
        };
        let car_id = parse_id::<CarId>(&require(self.car_id, CAR_ID)?, CAR_ID)?;
        let start = parse_instant(&require(self.start_date, START_DATE)?, START_DATE)?;
        let end = parse_instant(&require(self.end_date, END_DATE)?, END_DATE)?;
        Ok(CreateRentalRequest {
            user_id,
            car_id,
            start,
            end,
        })
    }
}

/// Body for `PUT /rentals/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    /// Pickup as a `YYYY-MM-DD` date or RFC 3339 timestamp.
    #[schema(example = "2024-02-01")]
    pub start_date: Option<String>,
    /// Return as a `YYYY-MM-DD` date or RFC 3339 timestamp.
    #[schema(example = "2024-02-03")]
    pub end_date: Option<String>,
}

fn rental_id(raw: &str) -> ApiResult<RentalId> {
    parse_id(raw, FieldName::new("id"))
}

/// Book a car and create the unpaid payment placeholder.
#[utoipa::path(
    post,
    path = "/rentals",
    request_body = RentalRequest,
    responses(
        (status = 200, description = "Rental created with an unpaid payment", body = RentalSchema),
        (status = 400, description = "Invalid request or date range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User or car not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "createRental"
)]
#[post("/rentals")]
pub async fn create_rental(
    auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<RentalRequest>,
) -> ApiResult<web::Json<Rental>> {
    let request = payload.into_inner().into_command(auth.into_inner().user_id)?;
    Ok(web::Json(state.rentals.create_rental(request).await?))
}

/// List every rental.
#[utoipa::path(
    get,
    path = "/rentals",
    responses(
        (status = 200, description = "Rentals", body = [RentalSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "listRentals"
)]
#[get("/rentals")]
pub async fn list_rentals(
    _auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Rental>>> {
    Ok(web::Json(state.rentals_query.list_rentals().await?))
}

/// Fetch one rental.
#[utoipa::path(
    get,
    path = "/rentals/{id}",
    params(("id" = String, Path, description = "Rental identifier")),
    responses(
        (status = 200, description = "Rental", body = RentalSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "getRental"
)]
#[get("/rentals/{id}")]
pub async fn get_rental(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Rental>> {
    let id = rental_id(&path)?;
    Ok(web::Json(state.rentals_query.get_rental(&id).await?))
}

/// Move an unpaid rental to new dates and reprice it.
#[utoipa::path(
    put,
    path = "/rentals/{id}",
    params(("id" = String, Path, description = "Rental identifier")),
    request_body = RescheduleRequest,
    responses(
        (status = 200, description = "Rescheduled rental", body = RentalSchema),
        (status = 400, description = "Invalid request or rental already paid", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "rescheduleRental"
)]
#[put("/rentals/{id}")]
pub async fn reschedule_rental(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RescheduleRequest>,
) -> ApiResult<web::Json<Rental>> {
    let rental_id = rental_id(&path)?;
    let RescheduleRequest {
        start_date,
        end_date,
    } = payload.into_inner();
    let start = parse_instant(&require(start_date, START_DATE)?, START_DATE)?;
    let end = parse_instant(&require(end_date, END_DATE)?, END_DATE)?;
    let rental = state
        .rentals
        .reschedule_rental(RescheduleRentalRequest {
            rental_id,
            start,
            end,
        })
        .await?;
    Ok(web::Json(rental))
}

/// Delete a rental together with its payment.
#[utoipa::path(
    delete,
    path = "/rentals/{id}",
    params(("id" = String, Path, description = "Rental identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "deleteRental"
)]
#[delete("/rentals/{id}")]
pub async fn delete_rental(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = rental_id(&path)?;
    state.rentals.delete_rental(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
