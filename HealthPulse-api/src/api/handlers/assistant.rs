use axum::extract::{Json, Path, State};
use tracing::instrument;
use uuid::Uuid;

use crate::entities::assistant::{GeneratedTextResponse, PredictionRequest, TreatmentPlanRequest};
use crate::entities::ErrorResponse;
use crate::state::AppState;

fn generated(state: &AppState, text: String) -> Json<GeneratedTextResponse> {
    Json(GeneratedTextResponse {
        text,
        provider: state.assistant.provider_name().to_string(),
    })
}

/// Possible conditions for a set of symptoms
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/predictions",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = PredictionRequest,
    responses(
        (status = 200, description = "Generated assessment", body = GeneratedTextResponse),
        (status = 400, description = "Empty symptoms", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Text generation failed", body = ErrorResponse),
    ),
    tag = "assistant"
)]
#[instrument(skip(state, request))]
pub async fn predict_disease(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<GeneratedTextResponse>, ErrorResponse> {
    let session = state.load_session(&id)?;
    let text = state.assistant.predict_disease(&session, &request.symptoms).await?;
    Ok(generated(&state, text))
}

/// Treatment plan for a condition
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/treatment-plans",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = TreatmentPlanRequest,
    responses(
        (status = 200, description = "Generated plan", body = GeneratedTextResponse),
        (status = 400, description = "Empty condition", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Text generation failed", body = ErrorResponse),
    ),
    tag = "assistant"
)]
#[instrument(skip(state, request), fields(condition = %request.condition))]
pub async fn create_treatment_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TreatmentPlanRequest>,
) -> Result<Json<GeneratedTextResponse>, ErrorResponse> {
    let session = state.load_session(&id)?;
    let text = state.assistant.treatment_plan(&session, &request.into()).await?;
    Ok(generated(&state, text))
}
