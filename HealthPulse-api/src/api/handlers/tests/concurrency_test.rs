use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use health_pulse_domain::providers::{ProviderError, ResponseProvider};

use super::{create_session, send, send_csv, test_app, CSV_HEADER};

/// Provider that answers after a fixed delay
struct SlowProvider {
    delay: Duration,
    reply: &'static str,
}

#[async_trait]
impl ResponseProvider for SlowProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.to_string())
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

fn slow_app(reply: &'static str) -> axum::Router {
    let (app, _) = test_app(Arc::new(SlowProvider {
        delay: Duration::from_millis(300),
        reply,
    }));
    app
}

#[tokio::test]
async fn test_upload_during_ask_is_kept() {
    let app = slow_app("Answer");
    let id = create_session(&app).await;

    let pending = {
        let app = app.clone();
        let uri = format!("/api/v1/sessions/{}/conversation", id);
        tokio::spawn(async move { send(&app, Method::POST, &uri, Some(json!({ "question": "Hi?" }))).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let csv = format!("{}2024-05-01,72,119,78,92,,,\n2024-05-02,74,121,80,95,,,\n", CSV_HEADER);
    let (status, _) = send_csv(&app, &format!("/api/v1/sessions/{}/health-data", id), &csv).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = pending.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turns"].as_array().unwrap().len(), 2);

    let (_, session) = send(&app, Method::GET, &format!("/api/v1/sessions/{}", id), None).await;
    assert_eq!(session["health_data"]["record_count"], 2);
    assert_eq!(session["turn_count"], 2);
}

#[tokio::test]
async fn test_profile_edit_during_document_extraction_is_kept() {
    let app = slow_app("no table here");
    let id = create_session(&app).await;

    let pending = {
        let app = app.clone();
        let uri = format!("/api/v1/sessions/{}/health-data/document", id);
        tokio::spawn(async move { send(&app, Method::POST, &uri, Some(json!({ "text": "Checkup notes" }))).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/sessions/{}/profile", id),
        Some(json!({ "field": "name", "value": "Robin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = pending.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record_count"], 31);

    let (_, session) = send(&app, Method::GET, &format!("/api/v1/sessions/{}", id), None).await;
    assert_eq!(session["profile"]["name"], "Robin");
    assert_eq!(session["health_data"]["record_count"], 31);
}

#[tokio::test]
async fn test_upload_during_insights_is_kept() {
    let app = slow_app("Looks steady.");
    let id = create_session(&app).await;

    let pending = {
        let app = app.clone();
        let uri = format!("/api/v1/sessions/{}/analytics/insights", id);
        tokio::spawn(async move { send(&app, Method::POST, &uri, None).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let csv = format!("{}2024-05-01,72,119,78,92,,,\n", CSV_HEADER);
    send_csv(&app, &format!("/api/v1/sessions/{}/health-data", id), &csv).await;

    let (status, _) = pending.await.unwrap();
    assert_eq!(status, StatusCode::OK);

    let (_, session) = send(&app, Method::GET, &format!("/api/v1/sessions/{}", id), None).await;
    assert_eq!(session["health_data"]["record_count"], 1);
}
