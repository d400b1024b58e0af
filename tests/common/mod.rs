#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use food_planner::config::{AirtableConfig, AppConfig};
use food_planner::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const GATE_SECRET: &str = "test-gate-secret";
pub const AIRTABLE_TOKEN: &str = "patTESTTOKEN.0123456789";
pub const BASE_ID: &str = "appTEST";

/// One request as seen by the stub Airtable.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    responses: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
}

/// In-process stand-in for the Airtable API.
///
/// Answers requests in order from a scripted queue and records everything it
/// receives. Unscripted requests get a 500.
pub struct StubAirtable {
    pub api_url: String,
    state: StubState,
}

impl StubAirtable {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(capture).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub Airtable");
        let addr = listener.local_addr().expect("Stub has no local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub Airtable crashed");
        });

        Self {
            api_url: format!("http://{}/v0", addr),
            state,
        }
    }

    pub fn respond(&self, status: u16, body: Value) -> &Self {
        let status = StatusCode::from_u16(status).expect("Invalid scripted status");
        self.state.responses.lock().unwrap().push_back((status, body));
        self
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn capture(State(state): State<StubState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    state.requests.lock().unwrap().push(CapturedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let scripted = state.responses.lock().unwrap().pop_front();
    match scripted {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "no scripted response" })),
        )
            .into_response(),
    }
}

pub fn test_config(api_url: &str) -> AppConfig {
    let mut airtable = AirtableConfig::new(BASE_ID, AIRTABLE_TOKEN);
    airtable.api_url = api_url.to_string();
    AppConfig {
        port: 0,
        airtable,
        gate_secret: GATE_SECRET.to_string(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub stub: StubAirtable,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Build the app against a fresh stub, letting the caller tweak the config.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let stub = StubAirtable::start().await;
        let mut config = test_config(&stub.api_url);
        tweak(&mut config);
        Self {
            router: router(AppState::new(config)),
            stub,
        }
    }

    pub async fn call(&self, request: axum::http::Request<Body>) -> (StatusCode, Value) {
        call(&self.router, request).await
    }
}

/// Send a request through `router` and decode the body as JSON, falling back
/// to a JSON string for plain-text responses.
pub async fn call(router: &Router, request: axum::http::Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router returned an error");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

pub fn request(method: Method, uri: &str, authorization: Option<&str>, body: Option<Value>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("Failed to build request")
}

pub fn authed_get(uri: &str) -> axum::http::Request<Body> {
    request(Method::GET, uri, Some(format!("Bearer {}", GATE_SECRET).as_str()), None)
}

pub fn authed_post(uri: &str, body: Value) -> axum::http::Request<Body> {
    request(Method::POST, uri, Some(format!("Bearer {}", GATE_SECRET).as_str()), Some(body))
}

/// POST a body verbatim, with whatever content type the caller chooses (or none).
pub fn authed_post_raw(uri: &str, body: &str, content_type: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", GATE_SECRET));
    if let Some(value) = content_type {
        builder = builder.header(header::CONTENT_TYPE, value);
    }
    builder.body(Body::from(body.to_string())).expect("Failed to build request")
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
