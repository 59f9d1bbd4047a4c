//! Tests for recognition HTTP handlers.

use super::*;
use crate::domain::ports::{MockLedgerCommand, MockLedgerQuery};
use crate::domain::{CreditAmount, EndorsementId, Error, TransferId};
use crate::inbound::http::test_utils::{account_id, mock_state, sample_instant};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::json;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(create_recognition)
            .service(get_recognition)
            .service(endorse_recognition),
    )
}

fn sample_transfer(request: &TransferRequest) -> Transfer {
    Transfer {
        id: TransferId::new(7).expect("positive id"),
        sender_id: account_id(request.sender_id),
        receiver_id: account_id(request.receiver_id),
        amount: CreditAmount::new(request.amount).expect("positive amount"),
        note: request.note.clone(),
        created_at: sample_instant(),
        endorsement_count: 0,
    }
}

#[rstest]
#[case(json!({"senderId": 1, "receiverId": 2, "amount": 40, "message": "great demo"}))]
#[case(json!({"senderId": 1, "receiverId": 2, "amount": "40", "message": "great demo"}))]
#[actix_web::test]
async fn create_recognition_forwards_request_and_returns_created(
    #[case] payload: serde_json::Value,
) {
    let mut command = MockLedgerCommand::new();
    command
        .expect_transfer()
        .withf(|request| {
            request.sender_id == 1
                && request.receiver_id == 2
                && request.amount == 40
                && request.note.as_deref() == Some("great demo")
        })
        .times(1)
        .returning(|request| Ok(sample_transfer(&request)));
    let app = actix_test::init_service(test_app(mock_state(command, MockLedgerQuery::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/recognitions")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["recognition"]["id"], 7);
    assert_eq!(body["recognition"]["senderId"], 1);
    assert_eq!(body["recognition"]["receiverId"], 2);
    assert_eq!(body["recognition"]["amount"], 40);
    assert_eq!(body["recognition"]["message"], "great demo");
    assert_eq!(body["recognition"]["endorsementCount"], 0);
}

#[rstest]
#[case(json!({"receiverId": 2, "amount": 5}), "senderId", "missing_field")]
#[case(json!({"senderId": 1, "amount": 5}), "receiverId", "missing_field")]
#[case(json!({"senderId": 1, "receiverId": 2}), "amount", "missing_field")]
#[case(json!({"senderId": 1, "receiverId": 2, "amount": "five"}), "amount", "invalid_integer")]
#[actix_web::test]
async fn create_recognition_rejects_malformed_payloads(
    #[case] payload: serde_json::Value,
    #[case] field: &str,
    #[case] detail_code: &str,
) {
    let mut command = MockLedgerCommand::new();
    command.expect_transfer().never();
    let app = actix_test::init_service(test_app(mock_state(command, MockLedgerQuery::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/recognitions")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], detail_code);
}

#[rstest]
#[case(Error::insufficient_balance("insufficient sendable balance"), StatusCode::BAD_REQUEST, "insufficient_balance")]
#[case(Error::sending_limit_exceeded("monthly sending limit exceeded"), StatusCode::BAD_REQUEST, "sending_limit_exceeded")]
#[case(Error::not_found("student 2 not found"), StatusCode::NOT_FOUND, "not_found")]
#[actix_web::test]
async fn create_recognition_maps_ledger_rejections(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let mut command = MockLedgerCommand::new();
    command
        .expect_transfer()
        .times(1)
        .return_once(move |_| Err(error));
    let app = actix_test::init_service(test_app(mock_state(command, MockLedgerQuery::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/recognitions")
        .set_json(json!({"senderId": 1, "receiverId": 2, "amount": 70}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), status);
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], code);
}

#[actix_web::test]
async fn get_recognition_includes_endorsement_count() {
    let mut query = MockLedgerQuery::new();
    query
        .expect_get_transfer()
        .withf(|id| *id == 7)
        .times(1)
        .returning(|_| {
            let mut transfer = sample_transfer(&TransferRequest {
                sender_id: 1,
                receiver_id: 2,
                amount: 40,
                note: None,
            });
            transfer.endorsement_count = 3;
            Ok(transfer)
        });
    let app = actix_test::init_service(test_app(mock_state(MockLedgerCommand::new(), query))).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/recognitions/7")
        .to_request();
    let body: serde_json::Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["recognition"]["endorsementCount"], 3);
    assert!(body["recognition"]["message"].is_null());
}

#[actix_web::test]
async fn endorse_returns_endorsement_and_new_count() {
    let mut command = MockLedgerCommand::new();
    command
        .expect_endorse()
        .withf(|request| request.transfer_id == 7 && request.endorser_id == 3)
        .times(1)
        .returning(|request| {
            Ok(EndorsementReceipt {
                endorsement: Endorsement {
                    id: EndorsementId::new(11).expect("positive id"),
                    transfer_id: TransferId::new(request.transfer_id).expect("positive id"),
                    endorser_id: account_id(request.endorser_id),
                    created_at: sample_instant(),
                },
                endorsement_count: 2,
            })
        });
    let app = actix_test::init_service(test_app(mock_state(command, MockLedgerQuery::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/recognitions/7/endorse")
        .set_json(json!({"endorserId": 3}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["endorsement"]["id"], 11);
    assert_eq!(body["endorsement"]["recognitionId"], 7);
    assert_eq!(body["endorsement"]["endorserId"], 3);
    assert_eq!(body["newEndorsementCount"], 2);
}

#[actix_web::test]
async fn duplicate_endorsement_is_a_bad_request() {
    let mut command = MockLedgerCommand::new();
    command.expect_endorse().times(1).returning(|_| {
        Err(Error::duplicate_endorsement(
            "you have already endorsed this recognition",
        ))
    });
    let app = actix_test::init_service(test_app(mock_state(command, MockLedgerQuery::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/recognitions/7/endorse")
        .set_json(json!({"endorserId": 3}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "duplicate_endorsement");
}

#[actix_web::test]
async fn endorse_without_endorser_is_rejected() {
    let mut command = MockLedgerCommand::new();
    command.expect_endorse().never();
    let app = actix_test::init_service(test_app(mock_state(command, MockLedgerQuery::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/recognitions/7/endorse")
        .set_json(json!({}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "endorserId");
}
