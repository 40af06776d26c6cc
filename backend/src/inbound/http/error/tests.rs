//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn response_body(error: &Error) -> (actix_web::http::header::HeaderMap, Error) {
    let response = ResponseError::error_response(error);
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error JSON deserialises");
    (headers, body)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id() {
    let error = Error::internal("connection string leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}));

    let (headers, body) = response_body(&error).await;

    assert_eq!(
        headers
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    assert_eq!(body.message(), "Internal server error");
    assert_eq!(body.trace_id(), Some(TRACE_ID));
    assert!(body.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("bad")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "title", "code": "empty_title"}));

    let (_, body) = response_body(&error).await;

    assert_eq!(body.message(), "bad");
    assert_eq!(
        body.details(),
        Some(&json!({"field": "title", "code": "empty_title"}))
    );
}

#[rstest]
#[actix_web::test]
async fn unauthorized_responses_carry_bearer_challenge() {
    let (headers, _) = response_body(&Error::unauthorized("could not validate credentials")).await;

    assert_eq!(
        headers
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some("Bearer")
    );
}

#[rstest]
#[actix_web::test]
async fn forbidden_responses_have_no_challenge() {
    let (headers, _) = response_body(&Error::forbidden("not enough permissions")).await;
    assert!(headers.get(WWW_AUTHENTICATE).is_none());
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_header() {
    let error = Error::not_found("missing");
    let (headers, body) = response_body(&error).await;

    assert!(body.trace_id().is_none());
    assert!(headers.get(TRACE_ID_HEADER).is_none());
}

#[rstest]
fn actix_client_errors_stay_client_errors() {
    let error = Error::from(actix_web::error::ErrorBadRequest("bad header"));
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "bad header");
}

#[rstest]
fn actix_server_errors_are_redacted() {
    let error = Error::from(actix_web::error::ErrorInternalServerError("pool exploded"));
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
}
