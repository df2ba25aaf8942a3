//! Account handlers: registration, login and user administration.
//!
//! ```text
//! POST /register {"fullName":"Ada Lovelace","email":"ada@example.com","password":"pw","phone":"555"}
//! POST /login {"email":"ada@example.com","password":"pw"}
//! GET /users/me
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccessToken, EmailAddress, FullName, LoginCredentials, Password, PhoneNumber, User,
    UserChanges, UserDraft, UserId, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{AccessTokenSchema, ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_login_validation_error, map_user_validation_error, parse_id,
};

/// Registration body for `POST /register` and `POST /users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account holder name.
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    /// Login email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Contact phone number.
    #[schema(example = "555-0100")]
    pub phone: String,
}

impl TryFrom<RegisterRequest> for UserDraft {
    type Error = UserValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.full_name, &value.email, &value.password, &value.phone)
    }
}

/// Login body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Partial profile update for `PUT /users/{id}`. Absent fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New account holder name.
    pub full_name: Option<String>,
    /// New login email.
    pub email: Option<String>,
    /// New contact number.
    pub phone: Option<String>,
    /// New password.
    pub password: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = UserValidationError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            full_name: value.full_name.map(FullName::new).transpose()?,
            email: value.email.map(EmailAddress::new).transpose()?,
            phone: value.phone.map(PhoneNumber::new).transpose()?,
            password: value.password.as_deref().map(Password::new).transpose()?,
        })
    }
}

fn user_id(raw: &str) -> ApiResult<UserId> {
    parse_id(raw, FieldName::new("id"))
}

/// Register a customer account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserSchema),
        (status = 400, description = "Invalid request or email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<User>> {
    let draft = UserDraft::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    let user = state.users_command.register(draft).await?;
    Ok(web::Json(user))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AccessTokenSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AccessToken>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(token))
}

/// List all accounts.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    _auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users_query.list_users().await?))
}

/// Profile of the caller.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<User>> {
    let user = state
        .users_query
        .current_user(&auth.into_inner().user_id)
        .await?;
    Ok(web::Json(user))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = user_id(&path)?;
    Ok(web::Json(state.users_query.get_user(&id).await?))
}

/// Create a customer account on behalf of someone else.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserSchema),
        (status = 400, description = "Invalid request or email already registered", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<User>> {
    let draft = UserDraft::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    Ok(web::Json(state.users_command.create_user(draft).await?))
}

/// Apply a partial profile update.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = user_id(&path)?;
    let changes =
        UserChanges::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    Ok(web::Json(state.users_command.update_user(&id, changes).await?))
}

/// Delete an account. Accounts with rentals cannot be deleted.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid identifier or user has rentals", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    state.users_command.delete_user(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
