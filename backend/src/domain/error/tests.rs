//! Tests for domain error construction and serialization.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no token"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("inactive user"), ErrorCode::Forbidden)]
#[case(Error::not_found("todo not found"), ErrorCode::NotFound)]
#[case(Error::conflict("email already registered"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::new(ErrorCode::InternalError, "");
    assert_eq!(error.message(), "unspecified error");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserializing_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let payload = json!({ "code": "not_found", "message": "missing" });
    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("valid payload")
    })
    .await;
    assert!(error.trace_id().is_none());
}

#[rstest]
fn serializes_camel_case_envelope(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "title", "code": "empty_title" }));
    let value = serde_json::to_value(&error).expect("serialize error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "bad",
            "traceId": expected_trace_id,
            "details": { "field": "title", "code": "empty_title" },
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::conflict("taken")).expect("serialize error");
    assert_eq!(value, json!({ "code": "conflict", "message": "taken" }));
}

#[rstest]
fn deserializing_rejects_blank_messages() {
    let payload = json!({ "code": "not_found", "message": " " });
    assert!(serde_json::from_value::<Error>(payload).is_err());
}
