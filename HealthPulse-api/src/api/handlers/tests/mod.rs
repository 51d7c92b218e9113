// Handler tests drive the full router with a stub response provider

mod concurrency_test;
mod health_test;
mod sessions_test;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use health_pulse_domain::providers::ResponseProvider;
use health_pulse_domain::testing::StubResponseProvider;

use crate::api::create_application;
use crate::config::AppConfig;
use crate::state::AppState;

pub(crate) const CSV_HEADER: &str =
    "date,heart_rate,systolic_bp,diastolic_bp,blood_glucose,temperature,weight,sleep_hours\n";

/// Router and state answering through `provider`
pub(crate) fn test_app(provider: Arc<dyn ResponseProvider>) -> (Router, AppState) {
    let state = AppState::new(AppConfig::default(), provider);
    (create_application(state.clone()), state)
}

/// Router whose provider always answers `reply`
pub(crate) fn stub_app(reply: &str) -> (Router, AppState, Arc<StubResponseProvider>) {
    let stub = Arc::new(StubResponseProvider::replying(reply));
    let (app, state) = test_app(stub.clone());
    (app, state, stub)
}

/// Send one request and return the status with the parsed JSON body (`Null` when empty)
pub(crate) async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
    };
    dispatch(app, request).await
}

/// Post a raw CSV body
pub(crate) async fn send_csv(app: &Router, uri: &str, csv: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv.to_string()))
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a session and return its id
pub(crate) async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}
