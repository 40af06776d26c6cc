//! Actix mapping for domain errors.
//!
//! The domain error stays HTTP-agnostic; this module picks the status code,
//! echoes the trace id header and redacts internal failures before they are
//! serialised.

use actix_web::http::header::{HeaderValue, WWW_AUTHENTICATE};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body actually sent to the client. Internal failures lose their message
/// and details but keep the trace id for correlation.
fn public_body(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(message = error.message(), "request failed with internal error");
    match error.trace_id() {
        Some(id) => Error::internal(REDACTED_MESSAGE).with_trace_id(id.to_owned()),
        None => Error::internal(REDACTED_MESSAGE),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        // OAuth2 bearer clients expect a challenge on every 401.
        if self.code() == ErrorCode::Unauthorized {
            builder.insert_header((WWW_AUTHENTICATE, HeaderValue::from_static("Bearer")));
        }
        builder.json(public_body(self))
    }
}

/// Framework errors surfacing in handlers. Client-side failures stay
/// `invalid_request`; anything else becomes a redacted internal error.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        let status = err.as_response_error().status_code();
        if status.is_client_error() {
            return Error::invalid_request(err.to_string());
        }
        error!(error = %err, %status, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
