use axum::extract::{Json, Path, State};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use health_pulse_data::ingest::parse_health_csv;

use crate::entities::health_data::{DocumentRequest, DocumentResponse, IngestResponse};
use crate::entities::ErrorResponse;
use crate::state::AppState;

/// Upload a CSV of daily health records.
///
/// Rows that fail to parse are skipped and listed in the response. The session's
/// series is replaced only when at least one row was accepted.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/health-data",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body(content = String, content_type = "text/csv", description = "CSV with a header row"),
    responses(
        (status = 200, description = "Upload processed", body = IngestResponse),
        (status = 400, description = "Unreadable CSV or missing required columns", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "health-data"
)]
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn upload_health_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: String,
) -> Result<Json<IngestResponse>, ErrorResponse> {
    // Fail fast on unknown sessions before parsing
    state.load_session(&id)?;
    let report = parse_health_csv(body.as_bytes())?;

    if !report.rejected.is_empty() {
        warn!("Skipped {} CSV rows for session {}", report.rejected.len(), id);
    }

    let accepted_rows = report.accepted_rows();
    let first_date = report.series.first_date();
    let last_date = report.series.last_date();
    let replaced = accepted_rows > 0;

    if replaced {
        let series = report.series;
        state.update_session(&id, |session| session.replace_series(series))?;
        info!("Stored {} records for session {}", accepted_rows, id);
    }

    Ok(Json(IngestResponse {
        accepted_rows,
        rejected: report.rejected,
        replaced,
        first_date,
        last_date,
    }))
}

/// Build the session's series from a medical document.
///
/// Only the resulting series is written to the session once the model call returns.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/health-data/document",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = DocumentRequest,
    responses(
        (status = 200, description = "Series stored", body = DocumentResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "health-data"
)]
#[instrument(skip(state, request), fields(chars = request.text.len()))]
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>, ErrorResponse> {
    state.load_session(&id)?;

    let outcome = state
        .assistant
        .extract_series(&request.text, state.config.synthetic_seed, state.today())
        .await;

    let series = state.update_session(&id, |session| session.replace_series(outcome.series))?;

    Ok(Json(DocumentResponse {
        method: outcome.method,
        record_count: series.len(),
        first_date: series.first_date(),
        last_date: series.last_date(),
    }))
}
