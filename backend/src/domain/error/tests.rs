//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::insufficient_balance("x"), ErrorCode::InsufficientBalance)]
#[case(Error::sending_limit_exceeded("x"), ErrorCode::SendingLimitExceeded)]
#[case(Error::insufficient_redeemable("x"), ErrorCode::InsufficientRedeemable)]
#[case(Error::duplicate_endorsement("x"), ErrorCode::DuplicateEndorsement)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::insufficient_balance("short") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({ "code": "not_found", "message": "account 7 not found" });

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("payload deserialises")
    })
    .await;

    assert!(error.trace_id().is_none());
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
fn serialises_with_snake_case_code_and_camel_case_fields() {
    let error = Error::sending_limit_exceeded("monthly sending limit exceeded")
        .with_trace_id("abc")
        .with_details(json!({ "limit": 100 }));

    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(
        value,
        json!({
            "code": "sending_limit_exceeded",
            "message": "monthly sending limit exceeded",
            "traceId": "abc",
            "details": { "limit": 100 }
        })
    );
}

#[rstest]
fn deserialising_blank_message_fails() {
    let result = serde_json::from_value::<Error>(json!({ "code": "internal_error", "message": " " }));
    assert!(result.is_err());
}
