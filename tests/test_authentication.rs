mod common;

use axum::http::{Method, StatusCode};
use common::{request, TestApp, GATE_SECRET};
use food_planner::server::{AccessPolicy, StaticBearer};
use food_planner::{router, AppState};
use pretty_assertions::assert_eq;
use serde_json::json;

const PROTECTED: &[(&str, &str)] = &[
    ("POST", "/api/add-recipe"),
    ("GET", "/api/recipes-sample"),
    ("GET", "/api/recipes-min"),
    ("GET", "/api/recipes/rec123"),
    ("POST", "/api/add-mealplan"),
    ("GET", "/api/mealplans"),
];

fn protected_request(method: &str, uri: &str, authorization: Option<&str>) -> axum::http::Request<axum::body::Body> {
    let method: Method = method.parse().unwrap();
    let body = (method == Method::POST)
        .then(|| json!({ "name": "x", "date": "2025-08-13", "recipe": "rec1" }));
    request(method, uri, authorization, body)
}

#[tokio::test]
async fn test_missing_header_is_rejected_without_outbound_call() {
    common::init_test_logging();
    let app = TestApp::new().await;

    for (method, uri) in PROTECTED {
        let (status, body) = app.call(protected_request(method, uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    assert_eq!(app.stub.request_count(), 0, "No Airtable call should be made");
}

#[tokio::test]
async fn test_wrong_token_is_rejected_without_outbound_call() {
    common::init_test_logging();
    let app = TestApp::new().await;

    let bad_headers = [
        "Bearer wrong".to_string(),
        GATE_SECRET.to_string(),
        format!("bearer {}", GATE_SECRET),
        format!("Bearer  {}", GATE_SECRET),
        format!("Bearer {} ", GATE_SECRET),
        format!("Basic {}", GATE_SECRET),
    ];

    for header in &bad_headers {
        for (method, uri) in PROTECTED {
            let (status, _) = app.call(protected_request(method, uri, Some(header.as_str()))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{:?} on {} {}", header, method, uri);
        }
    }

    assert_eq!(app.stub.request_count(), 0, "No Airtable call should be made");
}

#[tokio::test]
async fn test_correct_token_reaches_handler() {
    common::init_test_logging();
    let app = TestApp::new().await;
    app.stub.respond(200, json!({ "records": [] }));

    let (status, _) = app.call(common::authed_get("/api/mealplans")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stub.request_count(), 1);
}

#[tokio::test]
async fn test_health_and_banner_need_no_token() {
    common::init_test_logging();
    let app = TestApp::new().await;

    let (status, body) = app.call(request(Method::GET, "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    let ts = body["ts"].as_str().expect("ts should be a string");
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "ts should be RFC 3339: {}", ts);

    let (status, body) = app.call(request(Method::GET, "/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(food_planner::server::health::BANNER));

    assert_eq!(app.stub.request_count(), 0);
}

fn rotated_token(authorization: Option<&str>) -> bool {
    authorization == Some("Token rotated")
}

#[tokio::test]
async fn test_gate_can_be_replaced() {
    common::init_test_logging();
    let stub = common::StubAirtable::start().await;
    stub.respond(200, json!({ "records": [] }));

    let state = AppState::new(common::test_config(&stub.api_url))
        .with_gate(rotated_token);
    let app = router(state);

    let (status, _) = common::call(&app, common::authed_get("/api/mealplans")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "Old bearer secret should no longer pass");

    let (status, _) = common::call(
        &app,
        request(Method::GET, "/api/mealplans", Some("Token rotated"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stub.request_count(), 1);
}

#[test]
fn test_static_bearer_matches_exactly() {
    let gate = StaticBearer::new("s3cret");

    assert!(gate.allows(Some("Bearer s3cret")));
    assert!(!gate.allows(None));
    assert!(!gate.allows(Some("")));
    assert!(!gate.allows(Some("Bearer")));
    assert!(!gate.allows(Some("Bearer s3cret2")));
    assert!(!gate.allows(Some("s3cret")));
}
