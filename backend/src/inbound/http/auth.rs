//! Bearer-token extractors.
//!
//! Handlers take [`ActiveCaller`] or [`AdminOnly`] as arguments; extraction
//! runs the authorization gate so handler bodies only ever see callers that
//! already passed the activity and role checks.

use std::ops::Deref;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AdminCaller, Caller, Error, UNAUTHENTICATED_MESSAGE};

use super::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let unauthenticated = || Error::unauthorized(UNAUTHENTICATED_MESSAGE);
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(unauthenticated)?;

    let (scheme, token) = header
        .split_at_checked(BEARER_PREFIX.len())
        .ok_or_else(unauthenticated)?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return Err(unauthenticated());
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(unauthenticated());
    }
    Ok(token.to_owned())
}

async fn resolve_caller(
    state: Option<web::Data<HttpState>>,
    token: Result<String, Error>,
) -> Result<Caller, Error> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = token?;
    state.gate.resolve(&token).await?.require_active()
}

/// Active caller resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct ActiveCaller(pub Caller);

impl Deref for ActiveCaller {
    type Target = Caller;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for ActiveCaller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move { resolve_caller(state, token).await.map(Self) })
    }
}

/// Active caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminOnly(pub AdminCaller);

impl Deref for AdminOnly {
    type Target = AdminCaller;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AdminOnly {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let caller = resolve_caller(state, token).await?;
            caller.require_admin().map(Self)
        })
    }
}
