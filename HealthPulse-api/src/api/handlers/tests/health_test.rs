use std::sync::Arc;

use axum::http::{Method, StatusCode};

use health_pulse_domain::providers::CannedResponseProvider;

use super::{create_session, send, stub_app, test_app};

#[tokio::test]
async fn test_health_check_reports_components() {
    let (app, _, _) = stub_app("ok");
    create_session(&app).await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "stub");
    assert_eq!(body["components"]["response_provider"]["status"], "ok");
    assert_eq!(body["components"]["session_store"]["message"], "1 active sessions");
    assert_eq!(body["environment"], "development");
}

#[tokio::test]
async fn test_health_check_degraded_with_canned_provider() {
    let (app, _) = test_app(Arc::new(CannedResponseProvider::new(42)));

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    // Degraded still serves traffic
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["response_provider"]["status"], "degraded");
}
