//! End-to-end HTTP tests over the in-memory ledger.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use kudos_backend::Trace;
use kudos_backend::domain::{LedgerService, TRACE_ID_HEADER};
use kudos_backend::inbound::http;
use kudos_backend::inbound::http::state::HttpState;
use kudos_backend::outbound::memory::InMemoryLedgerRepository;
use kudos_backend::test_support::clock::MutableClock;
use rstest::rstest;
use serde_json::{Value, json};

fn ledger_state(clock: Arc<MutableClock>) -> HttpState {
    let service = Arc::new(LedgerService::new(
        Arc::new(InMemoryLedgerRepository::new()),
        clock,
    ));
    HttpState::new(service.clone(), service)
}

macro_rules! ledger_app {
    ($clock:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ledger_state($clock)))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(http::configure)),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let request = actix_test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        actix_test::call_service($app, request).await
    }};
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let request = actix_test::TestRequest::get().uri($uri).to_request();
        let body: Value = actix_test::call_and_read_body_json($app, request).await;
        body
    }};
}

#[actix_web::test]
async fn recognition_flow_updates_balances_endorsements_and_leaderboard() {
    let app = ledger_app!(Arc::new(MutableClock::at_date(2026, 3, 10)));

    for name in ["Ada", "Bo", "Cy"] {
        let response = post_json!(&app, "/api/v1/students", json!({"name": name}));
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = post_json!(
        &app,
        "/api/v1/recognitions",
        json!({"senderId": 1, "receiverId": 2, "amount": "40", "message": "thanks"})
    );
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    let recognition_id = body["recognition"]["id"].as_i64().expect("recognition id");

    let response = post_json!(
        &app,
        &format!("/api/v1/recognitions/{recognition_id}/endorse"),
        json!({"endorserId": 3})
    );
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["newEndorsementCount"], 1);

    let sender = get_json!(&app, "/api/v1/students/1");
    assert_eq!(sender["student"]["sendableBalance"], 60);
    assert_eq!(sender["student"]["monthlySent"], 40);

    let recognition = get_json!(&app, &format!("/api/v1/recognitions/{recognition_id}"));
    assert_eq!(recognition["recognition"]["message"], "thanks");
    assert_eq!(recognition["recognition"]["endorsementCount"], 1);

    let board = get_json!(&app, "/api/v1/leaderboard?limit=2");
    let rows = board["leaderboard"].as_array().expect("leaderboard rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["studentId"], 2);
    assert_eq!(rows[0]["endorsementsReceivedTotal"], 1);
    assert_eq!(rows[1]["studentId"], 1);
}

#[actix_web::test]
async fn rejections_carry_code_reason_and_trace_id() {
    let app = ledger_app!(Arc::new(MutableClock::at_date(2026, 3, 10)));
    for name in ["Ada", "Bo"] {
        post_json!(&app, "/api/v1/students", json!({"name": name}));
    }

    let response = post_json!(
        &app,
        "/api/v1/recognitions",
        json!({"senderId": 1, "receiverId": 2, "amount": 101})
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "insufficient_balance");
    assert_eq!(body["traceId"], header.as_str());

    let response = post_json!(
        &app,
        "/api/v1/recognitions",
        json!({"senderId": 1, "receiverId": 1, "amount": 5})
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json!(
        &app,
        "/api/v1/recognitions",
        json!({"senderId": 1, "receiverId": 99, "amount": 5})
    );
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json!(&app, "/api/v1/students/2/redeem", json!({"credits": 1}));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "insufficient_redeemable");
}

#[actix_web::test]
async fn admin_reset_rolls_every_account_into_the_new_month() {
    let clock = Arc::new(MutableClock::at_date(2026, 3, 10));
    let app = ledger_app!(clock.clone());
    for name in ["Ada", "Bo"] {
        post_json!(&app, "/api/v1/students", json!({"name": name}));
    }
    post_json!(
        &app,
        "/api/v1/recognitions",
        json!({"senderId": 1, "receiverId": 2, "amount": 90})
    );

    clock.advance_days(30);
    let response = post_json!(&app, "/api/v1/admin/reset-all", json!({}));
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["accountsReset"], 2);

    let ada = get_json!(&app, "/api/v1/students/1");
    assert_eq!(ada["student"]["sendableBalance"], 110);
    assert_eq!(ada["student"]["monthlySent"], 0);
    assert_eq!(ada["student"]["lastReset"], "2026-04-09");

    let bo = get_json!(&app, "/api/v1/students/2");
    assert_eq!(bo["student"]["sendableBalance"], 150);
    assert_eq!(bo["student"]["redeemableBalance"], 90);

    let response = post_json!(&app, "/api/v1/admin/reset-all", json!({}));
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["accountsReset"], 0);
}

#[rstest]
#[case("/api/v1/students", json!({"name": 5}))]
#[case("/api/v1/recognitions", json!({"senderId": "1", "receiverId": 2, "amount": 5}))]
#[case("/api/v1/students/1/redeem", json!("five credits"))]
#[actix_web::test]
async fn mistyped_bodies_are_invalid_requests(#[case] uri: &str, #[case] payload: Value) {
    let app = ledger_app!(Arc::new(MutableClock::at_date(2026, 3, 10)));
    post_json!(&app, "/api/v1/students", json!({"name": "Ada"}));

    let response = post_json!(&app, uri, payload);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "malformed_body");
    assert!(body["details"]["reason"].is_string());
    assert_eq!(body["traceId"], header.as_str());
}

#[actix_web::test]
async fn missing_body_or_content_type_is_an_invalid_request() {
    let app = ledger_app!(Arc::new(MutableClock::at_date(2026, 3, 10)));

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "unsupported_content_type");

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"name": "Ada"}"#)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "unsupported_content_type");

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "malformed_body");
}

#[actix_web::test]
async fn non_numeric_path_ids_are_not_found() {
    let app = ledger_app!(Arc::new(MutableClock::at_date(2026, 3, 10)));

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/students/abc")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn zero_limit_yields_an_empty_leaderboard() {
    let app = ledger_app!(Arc::new(MutableClock::at_date(2026, 3, 10)));
    for name in ["Ada", "Bo"] {
        post_json!(&app, "/api/v1/students", json!({"name": name}));
    }

    let board = get_json!(&app, "/api/v1/leaderboard?limit=0");
    assert_eq!(board["leaderboard"], json!([]));
}
