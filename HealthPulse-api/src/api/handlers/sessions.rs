use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use health_pulse_domain::session::SessionState;

use crate::entities::session::{
    AskRequest, AskResponse, ConversationResponse, SessionView, UpdateProfileRequest,
};
use crate::entities::ErrorResponse;
use crate::state::AppState;

/// Start a new session
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionView),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(state))]
pub async fn create_session(State(state): State<AppState>) -> Result<impl IntoResponse, ErrorResponse> {
    let session = SessionState::new();
    let view = SessionView::from(&session);
    state.sessions.insert(session.id(), session)?;

    info!("Created session {}", view.id);
    Ok((StatusCode::CREATED, Json(view)))
}

/// Get a session's profile and data summary
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session found", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let session = state.load_session(&id)?;
    Ok(Json(SessionView::from(&session)))
}

/// End a session and discard its state
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(state))]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ErrorResponse> {
    state.sessions.remove(&id)?;
    info!("Ended session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Reset profile, conversation and health data to their defaults
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/reset",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session reset", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(state))]
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let view = state.update_session(&id, |session| {
        session.reset();
        SessionView::from(&*session)
    })?;
    Ok(Json(view))
}

/// Update one profile field
#[utoipa::path(
    patch,
    path = "/api/v1/sessions/{id}/profile",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = SessionView),
        (status = 400, description = "Invalid value", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(state, request), fields(field = ?request.field))]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let value = request
        .value_text()
        .ok_or_else(|| ErrorResponse::validation_error("value must be a string or a number"))?;

    let field = request.field;
    let updated = state.update_session(&id, |session| {
        session
            .update_profile(field, &value)
            .map(|_| SessionView::from(&*session))
    })?;

    match updated {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            warn!("Rejected profile update for session {}: {}", id, e);
            Err(ErrorResponse::from(e).with_details(json!({ "field": field })))
        }
    }
}

/// Conversation history, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/conversation",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Conversation turns", body = ConversationResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "assistant"
)]
#[instrument(skip(state))]
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationResponse>, ErrorResponse> {
    let session = state.load_session(&id)?;
    Ok(Json(ConversationResponse {
        turns: session.conversation().to_vec(),
    }))
}

/// Ask the assistant a question.
///
/// The model call runs against a copy of the session; only the turns it produced are
/// appended to the stored session afterwards, so edits made meanwhile are kept. A failed
/// model call is recorded as a failed turn before the error is returned.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/conversation",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = AskRequest,
    responses(
        (status = 200, description = "Assistant answer", body = AskResponse),
        (status = 400, description = "Empty question", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Text generation failed", body = ErrorResponse),
    ),
    tag = "assistant"
)]
#[instrument(skip(state, request))]
pub async fn ask_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ErrorResponse> {
    let mut session = state.load_session(&id)?;
    let recorded = session.conversation().len();
    let result = state.assistant.ask(&mut session, &request.question).await;

    let new_turns = session.conversation()[recorded..].to_vec();
    let turns = state.update_session(&id, |stored| {
        stored.extend_conversation(new_turns);
        stored.conversation().to_vec()
    })?;

    let answer = result?;
    Ok(Json(AskResponse { answer, turns }))
}
