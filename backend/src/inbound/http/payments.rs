//! Payment handlers.
//!
//! `POST /payments` settles the placeholder payment of an unpaid rental. The
//! amount must equal the rental's total price; settling a paid rental is
//! rejected with code `already_paid`.
//!
//! ```text
//! POST /payments {"rentalId":"…","method":"card","amount":"300.00"}
//! PUT /payments/{id} {"method":"cash"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ports::SettlePaymentRequest;
use crate::domain::{Error, Money, Payment, PaymentId, PaymentMethod, RentalId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, PaymentSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_amount_error, map_payment_method_error, parse_id, require,
};

const RENTAL_ID: FieldName = FieldName::new("rentalId");

/// Body for `POST /payments`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlePaymentBody {
    /// Rental to settle.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub rental_id: Option<String>,
    /// How the customer paid, e.g. `card`.
    #[schema(example = "card")]
    pub method: Option<String>,
    /// Must equal the rental total.
    #[schema(value_type = Option<String>, example = "300.00")]
    pub amount: Option<Decimal>,
}

impl TryFrom<SettlePaymentBody> for SettlePaymentRequest {
    type Error = Error;

    fn try_from(body: SettlePaymentBody) -> Result<Self, Self::Error> {
        let rental_id = parse_id::<RentalId>(&require(body.rental_id, RENTAL_ID)?, RENTAL_ID)?;
        let method = PaymentMethod::new(require(body.method, FieldName::new("method"))?)
            .map_err(map_payment_method_error)?;
        let amount = Money::new(require(body.amount, FieldName::new("amount"))?)
            .map_err(map_amount_error)?;
        Ok(Self {
            rental_id,
            method,
            amount,
        })
    }
}

/// Body for `PUT /payments/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentBody {
    /// Corrected payment method.
    #[schema(example = "cash")]
    pub method: String,
}

fn payment_id(raw: &str) -> ApiResult<PaymentId> {
    parse_id(raw, FieldName::new("id"))
}

/// Settle the payment of an unpaid rental.
#[utoipa::path(
    post,
    path = "/payments",
    request_body = SettlePaymentBody,
    responses(
        (status = 200, description = "Settled payment", body = PaymentSchema),
        (status = 400, description = "Invalid request, amount mismatch or already paid", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Rental not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "settlePayment"
)]
#[post("/payments")]
pub async fn settle_payment(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<SettlePaymentBody>,
) -> ApiResult<web::Json<Payment>> {
    let request = SettlePaymentRequest::try_from(payload.into_inner())?;
    Ok(web::Json(state.payments.settle_payment(request).await?))
}

/// List every payment.
#[utoipa::path(
    get,
    path = "/payments",
    responses(
        (status = 200, description = "Payments", body = [PaymentSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    _auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Payment>>> {
    Ok(web::Json(state.payments_query.list_payments().await?))
}

/// Fetch one payment.
#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment", body = PaymentSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "getPayment"
)]
#[get("/payments/{id}")]
pub async fn get_payment(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Payment>> {
    let id = payment_id(&path)?;
    Ok(web::Json(state.payments_query.get_payment(&id).await?))
}

/// Correct the method recorded on a settled payment.
#[utoipa::path(
    put,
    path = "/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    request_body = UpdatePaymentBody,
    responses(
        (status = 200, description = "Updated payment", body = PaymentSchema),
        (status = 400, description = "Invalid request or payment not settled", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "updatePaymentMethod"
)]
#[put("/payments/{id}")]
pub async fn update_payment(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePaymentBody>,
) -> ApiResult<web::Json<Payment>> {
    let id = payment_id(&path)?;
    let method = PaymentMethod::new(&payload.method).map_err(map_payment_method_error)?;
    Ok(web::Json(
        state.payments.update_payment_method(&id, method).await?,
    ))
}

/// Delete a payment together with its rental.
#[utoipa::path(
    delete,
    path = "/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "deletePayment"
)]
#[delete("/payments/{id}")]
pub async fn delete_payment(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = payment_id(&path)?;
    state.payments.delete_payment(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
