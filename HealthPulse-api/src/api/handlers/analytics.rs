use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use tracing::{debug, instrument};
use uuid::Uuid;

use health_pulse_data::models::{HealthSeries, Metric};
use health_pulse_domain::entities::analytics::{HealthReport, MetricSummary, Window};
use health_pulse_domain::session::SessionState;

use crate::entities::assistant::GeneratedTextResponse;
use crate::entities::health_data::SummaryQueryParams;
use crate::entities::ErrorResponse;
use crate::state::AppState;

// Sessions without uploaded data get the synthetic demo series. The series is only
// written when it did not exist yet; reads never store a copy back.
fn session_series(state: &AppState, id: &Uuid) -> Result<(SessionState, Arc<HealthSeries>), ErrorResponse> {
    let session = state.load_session(id)?;
    if let Some(series) = session.series() {
        return Ok((session, series));
    }

    debug!("Generating demo series for session {}", id);
    let (seed, today) = (state.config.synthetic_seed, state.today());
    let series = state.update_session(id, |stored| stored.ensure_series(seed, today))?;
    Ok((session, series))
}

/// Dashboard report for a session's health data
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/analytics",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Health report", body = HealthReport),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "Not enough data", body = ErrorResponse),
    ),
    tag = "analytics"
)]
#[instrument(skip(state))]
pub async fn get_analytics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HealthReport>, ErrorResponse> {
    let (_, series) = session_series(&state, &id)?;
    let report = state.analytics.report(&series)?;
    Ok(Json(report))
}

/// Summary of one metric over one window
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/analytics/summary",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        SummaryQueryParams
    ),
    responses(
        (status = 200, description = "Metric summary", body = MetricSummary),
        (status = 400, description = "Unknown metric or malformed window", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "No values in the window", body = ErrorResponse),
    ),
    tag = "analytics"
)]
#[instrument(skip(state))]
pub async fn get_metric_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<SummaryQueryParams>,
) -> Result<Json<MetricSummary>, ErrorResponse> {
    let metric: Metric = params.metric.parse().map_err(ErrorResponse::bad_request)?;
    let window = match params.window.as_deref() {
        Some(raw) => raw.parse::<Window>().map_err(ErrorResponse::bad_request)?,
        None => Window::All,
    };

    let (_, series) = session_series(&state, &id)?;
    let summary = state.analytics.summary(&series, metric, window)?;
    Ok(Json(summary))
}

/// Ask the assistant to interpret the session's health report
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/analytics/insights",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Generated analysis", body = GeneratedTextResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "Not enough data", body = ErrorResponse),
        (status = 502, description = "Text generation failed", body = ErrorResponse),
    ),
    tag = "analytics"
)]
#[instrument(skip(state))]
pub async fn generate_health_insights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GeneratedTextResponse>, ErrorResponse> {
    let (session, series) = session_series(&state, &id)?;
    let report = state.analytics.report(&series)?;
    let text = state.assistant.analyze_health(&session, &report).await?;

    Ok(Json(GeneratedTextResponse {
        text,
        provider: state.assistant.provider_name().to_string(),
    }))
}
