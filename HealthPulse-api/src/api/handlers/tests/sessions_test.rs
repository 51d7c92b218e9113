use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use health_pulse_domain::providers::ProviderError;
use health_pulse_domain::testing::StubResponseProvider;

use super::{create_session, send, stub_app, test_app};

#[tokio::test]
async fn test_create_session_starts_with_default_profile() {
    let (app, _, _) = stub_app("ok");

    let (status, body) = send(&app, Method::POST, "/api/v1/sessions", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["profile"]["age"], 25);
    assert_eq!(body["profile"]["gender"], "Male");
    assert_eq!(body["turn_count"], 0);
    assert!(body.get("health_data").is_none());
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (app, _, _) = stub_app("ok");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_update_profile_fields() {
    let (app, _, _) = stub_app("ok");
    let id = create_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/profile", id);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "field": "age", "value": 42 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["age"], 42);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "field": "gender", "value": "Prefer not to say" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["gender"], "Prefer not to say");
}

#[tokio::test]
async fn test_update_profile_rejects_out_of_range_age() {
    let (app, _, _) = stub_app("ok");
    let id = create_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/profile", id);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "field": "age", "value": 121 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"]["field"], "age");

    // The stored profile is unchanged
    let (_, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{}", id), None).await;
    assert_eq!(body["profile"]["age"], 25);
}

#[tokio::test]
async fn test_ask_records_both_turns() {
    let (app, _, stub) = stub_app("Drink more water.");
    let id = create_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/conversation", id);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "question": "How much water?" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Drink more water.");
    assert_eq!(body["turns"].as_array().unwrap().len(), 2);
    assert_eq!(body["turns"][0]["role"], "user");
    assert_eq!(body["turns"][1]["role"], "assistant");
    assert!(stub.prompts()[0].contains("How much water?"));

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["turns"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_ask_keeps_failed_turn() {
    let stub = Arc::new(StubResponseProvider::failing(ProviderError::Auth("invalid key".to_string())));
    let (app, _) = test_app(stub);
    let id = create_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/conversation", id);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "question": "Hello?" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "external_service_error");

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    let turns = body["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1]["status"], "failed");
}

#[tokio::test]
async fn test_empty_question_is_rejected_without_calling_provider() {
    let (app, _, stub) = stub_app("unused");
    let id = create_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/conversation", id);

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "question": "   " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(stub.prompts().is_empty());
}

#[tokio::test]
async fn test_reset_keeps_id_and_clears_state() {
    let (app, _, _) = stub_app("answer");
    let id = create_session(&app).await;

    send(
        &app,
        Method::PATCH,
        &format!("/api/v1/sessions/{}/profile", id),
        Some(json!({ "field": "name", "value": "Dana" })),
    )
    .await;
    send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{}/conversation", id),
        Some(json!({ "question": "Hi" })),
    )
    .await;

    let (status, body) = send(&app, Method::POST, &format!("/api/v1/sessions/{}/reset", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["profile"]["name"], "");
    assert_eq!(body["turn_count"], 0);
}

#[tokio::test]
async fn test_delete_session() {
    let (app, state, _) = stub_app("ok");
    let id = create_session(&app).await;
    let uri = format!("/api/v1/sessions/{}", id);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.sessions.len().unwrap(), 0);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
