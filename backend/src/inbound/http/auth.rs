//! Bearer-token authentication for HTTP handlers.
//!
//! Protected handlers take an [`Authenticated`] argument. Extraction reads
//! `Authorization: Bearer <token>` and asks the [`LoginService`] port to
//! verify it, so handlers never see an unauthenticated request.
//!
//! [`LoginService`]: crate::domain::ports::LoginService

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthenticatedUser, Error};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Identity of the caller, established from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub AuthenticatedUser);

impl Authenticated {
    /// Unwrap the verified identity.
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, raw_token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(Error::unauthorized("authorization scheme must be Bearer"));
    }
    let token = raw_token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized("missing bearer token"));
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    state.login.authenticate(token).map(Authenticated).map_err(|err| {
        debug!(code = ?err.code(), "bearer token rejected");
        err
    })
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
