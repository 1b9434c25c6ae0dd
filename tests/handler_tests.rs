//! Integration tests for the webhook and health handlers.
//!
//! Tests exercise the handler functions directly against a loaded store,
//! and verify the full HTTP flow through the axum router.

use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use retell_lookup_server::config::ContactSource;
use retell_lookup_server::handlers;
use retell_lookup_server::loader::load_reader;
use retell_lookup_server::protocol::{LookupStatus, LOOKUP_SOURCE};
use retell_lookup_server::server::{router, AppState, HEALTH_PATH, WEBHOOK_PATH};
use retell_lookup_server::store::ContactStore;
use serde_json::{json, Value};
use tower::ServiceExt;

const FIXTURE: &str = "\
FIRSTNAME,MASTERACCT,FULL_NAME,ACCOUNT,CLTREFNO,PHONE1,PHONE2
Maria,47,Maria Lopez,ACC-100,CLT-9,5551234567,5559876543
Tom,03,Tom Reed,ACC-200,CLT-7,(555) 000-1111,
Zed,88,Zed Quinn,ACC-300,CLT-5,12345,
";

fn fixture_store() -> ContactStore {
    let (store, _) = load_reader(FIXTURE.as_bytes(), &ContactSource::default()).unwrap();
    store
}

fn webhook_payload(from_number: Value) -> Value {
    json!({
        "event": "call_inbound",
        "call_inbound": {
            "agent_id": "agent_123",
            "from_number": from_number,
            "to_number": "+15550009999"
        }
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

// ---------------------------------------------------------------------------
// webhook handler tests
// ---------------------------------------------------------------------------

#[test]
fn webhook_found_fills_variables_and_metadata() {
    let store = fixture_store();

    let response = handlers::webhook::handle(&webhook_payload(json!("+1 (555) 123-4567")), &store);
    assert_eq!(response.status(), LookupStatus::Found);

    let value = to_json(&response);
    let inbound = &value["call_inbound"];
    assert_eq!(inbound["dynamic_variables"]["full_name"], "Maria");
    assert_eq!(inbound["dynamic_variables"]["ssn_last_two_digit"], "47");
    assert_eq!(inbound["metadata"]["source"], LOOKUP_SOURCE);
    assert_eq!(inbound["metadata"]["lookup_status"], "found");
    assert_eq!(inbound["metadata"]["account"], "ACC-100");
    assert_eq!(inbound["metadata"]["cltrefno"], "CLT-9");
}

#[test]
fn webhook_matches_secondary_phone_column() {
    let store = fixture_store();

    let response = handlers::webhook::handle(&webhook_payload(json!("555-987-6543")), &store);
    assert_eq!(response.status(), LookupStatus::Found);
    assert_eq!(response.call_inbound.dynamic_variables.full_name, "Maria");
}

#[test]
fn webhook_account_reference_keeps_leading_zero() {
    let store = fixture_store();

    let response = handlers::webhook::handle(&webhook_payload(json!("15550001111")), &store);
    assert_eq!(response.call_inbound.dynamic_variables.ssn_last_two_digit, "03");
}

#[test]
fn webhook_accepts_numeric_from_number() {
    let store = fixture_store();

    let response = handlers::webhook::handle(&webhook_payload(json!(15551234567u64)), &store);
    assert_eq!(response.status(), LookupStatus::Found);
}

#[test]
fn webhook_unknown_caller_is_not_found() {
    let store = fixture_store();

    let response = handlers::webhook::handle(&webhook_payload(json!("+1 555 404 0404")), &store);
    assert_eq!(response.status(), LookupStatus::NotFound);

    let value = to_json(&response);
    let inbound = &value["call_inbound"];
    assert_eq!(inbound["dynamic_variables"]["full_name"], "");
    assert_eq!(inbound["dynamic_variables"]["ssn_last_two_digit"], "");
    assert_eq!(inbound["metadata"]["lookup_status"], "not_found");
    assert_eq!(inbound["metadata"]["source"], LOOKUP_SOURCE);

    let metadata = inbound["metadata"].as_object().unwrap();
    assert!(!metadata.contains_key("account"), "not_found must omit account");
    assert!(!metadata.contains_key("cltrefno"), "not_found must omit cltrefno");
}

#[test]
fn webhook_empty_missing_or_short_number_is_not_found() {
    let store = fixture_store();

    let payloads = vec![
        webhook_payload(json!("")),
        webhook_payload(Value::Null),
        webhook_payload(json!("12345")),
        webhook_payload(json!({ "nested": "5551234567" })),
        json!({ "call_inbound": {} }),
        json!({}),
        json!("not an object"),
        Value::Null,
    ];

    for payload in payloads {
        let response = handlers::webhook::handle(&payload, &store);
        assert_eq!(
            response.status(),
            LookupStatus::NotFound,
            "payload {payload} should not match"
        );
    }
}

#[test]
fn webhook_is_deterministic() {
    let store = fixture_store();
    let payload = webhook_payload(json!("5551234567"));

    let a = serde_json::to_string(&handlers::webhook::handle(&payload, &store)).unwrap();
    let b = serde_json::to_string(&handlers::webhook::handle(&payload, &store)).unwrap();

    assert_eq!(a, b, "webhook must produce byte-identical output across calls");
}

// ---------------------------------------------------------------------------
// health handler tests
// ---------------------------------------------------------------------------

#[test]
fn health_reports_phone_entries() {
    let store = fixture_store();

    let response = handlers::health::handle(&store, Instant::now());
    assert_eq!(response.status, "ok");
    // Maria x2 + Tom x1; Zed's number is too short
    assert_eq!(response.contacts_loaded, 3);
    assert!(response.uptime >= 0.0);
}

#[test]
fn health_uptime_counts_from_start() {
    let store = ContactStore::new();
    let started_at = Instant::now() - Duration::from_secs(5);

    let response = handlers::health::handle(&store, started_at);
    assert_eq!(response.contacts_loaded, 0);
    assert!(response.uptime >= 5.0);
}

// ---------------------------------------------------------------------------
// Router integration tests
// ---------------------------------------------------------------------------

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_webhook(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn router_webhook_found() {
    let state = AppState::new(fixture_store(), Instant::now());
    let body = webhook_payload(json!("+1 (555) 123-4567")).to_string();

    let (status, value) = send(state, post_webhook(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["call_inbound"]["dynamic_variables"]["full_name"], "Maria");
    assert_eq!(value["call_inbound"]["metadata"]["lookup_status"], "found");
}

#[tokio::test]
async fn router_webhook_unknown_caller_is_ok() {
    let state = AppState::new(fixture_store(), Instant::now());
    let body = webhook_payload(json!("+1 (555) 999-0000")).to_string();

    let (status, value) = send(state, post_webhook(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["call_inbound"]["metadata"]["lookup_status"], "not_found");
}

#[tokio::test]
async fn router_webhook_malformed_body_is_not_found() {
    let state = AppState::new(fixture_store(), Instant::now());

    for body in ["", "{broken", "[1, 2, 3]"] {
        let (status, value) = send(state.clone(), post_webhook(body)).await;
        assert_eq!(status, StatusCode::OK, "body {body:?} must still get 200");
        assert_eq!(value["call_inbound"]["metadata"]["lookup_status"], "not_found");
    }
}

#[tokio::test]
async fn router_health_reports_store_size() {
    let state = AppState::new(fixture_store(), Instant::now());
    let request = Request::builder()
        .method(Method::GET)
        .uri(HEALTH_PATH)
        .body(Body::empty())
        .unwrap();

    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["contacts_loaded"], 3);
    assert!(value["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn router_unknown_path_is_404() {
    let state = AppState::new(ContactStore::new(), Instant::now());
    let request = Request::builder()
        .method(Method::GET)
        .uri("/nope")
        .body(Body::empty())
        .unwrap();

    let response = router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
