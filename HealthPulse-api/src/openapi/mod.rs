use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Session endpoints
        crate::api::handlers::sessions::create_session,
        crate::api::handlers::sessions::get_session,
        crate::api::handlers::sessions::delete_session,
        crate::api::handlers::sessions::reset_session,
        crate::api::handlers::sessions::update_profile,

        // Assistant endpoints
        crate::api::handlers::sessions::get_conversation,
        crate::api::handlers::sessions::ask_question,
        crate::api::handlers::assistant::predict_disease,
        crate::api::handlers::assistant::create_treatment_plan,

        // Health data endpoints
        crate::api::handlers::health_data::upload_health_data,
        crate::api::handlers::health_data::upload_document,

        // Analytics endpoints
        crate::api::handlers::analytics::get_analytics,
        crate::api::handlers::analytics::get_metric_summary,
        crate::api::handlers::analytics::generate_health_insights
    ),
    components(
        schemas(
            // Entities
            crate::entities::common::ErrorResponse,
            crate::entities::session::SessionView,
            crate::entities::session::SeriesSummary,
            crate::entities::session::UpdateProfileRequest,
            crate::entities::session::ConversationResponse,
            crate::entities::session::AskRequest,
            crate::entities::session::AskResponse,
            crate::entities::health_data::IngestResponse,
            crate::entities::health_data::DocumentRequest,
            crate::entities::health_data::DocumentResponse,
            crate::entities::health_data::SummaryQueryParams,
            crate::entities::assistant::PredictionRequest,
            crate::entities::assistant::TreatmentPlanRequest,
            crate::entities::assistant::GeneratedTextResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain schemas
            health_pulse_domain::entities::PatientProfile,
            health_pulse_domain::entities::Gender,
            health_pulse_domain::entities::ProfileField,
            health_pulse_domain::entities::ConversationTurn,
            health_pulse_domain::entities::Role,
            health_pulse_domain::entities::TurnStatus,
            health_pulse_domain::entities::HealthReport,
            health_pulse_domain::entities::AggregateSnapshot,
            health_pulse_domain::entities::MetricSummary,
            health_pulse_domain::entities::Window,
            health_pulse_domain::entities::TrendComparison,
            health_pulse_domain::entities::Trend,
            health_pulse_domain::entities::CorrelationMatrix,
            health_pulse_domain::entities::HealthInsights,
            health_pulse_domain::entities::HeartRateCategory,
            health_pulse_domain::entities::BloodPressureCategory,
            health_pulse_domain::entities::GlucoseCategory,
            health_pulse_domain::entities::HealthScore,
            health_pulse_domain::entities::HealthRating,
            health_pulse_domain::services::ExtractionMethod,

            // Data schemas
            health_pulse_data::models::Metric,
            health_pulse_data::ingest::ParseError
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "sessions", description = "Session and patient profile management"),
        (name = "health-data", description = "Health record uploads"),
        (name = "analytics", description = "Aggregates, trends, insights and health score"),
        (name = "assistant", description = "Chat, disease prediction and treatment plans")
    ),
    info(
        title = "HealthPulse API",
        version = "0.1.0",
        description = "Health analytics dashboard and text-generation assistant",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "HealthPulse API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().expect("tags should be defined");
        for name in ["health", "sessions", "health-data", "analytics", "assistant"] {
            assert!(tags.iter().any(|tag| tag.name == name), "missing tag {}", name);
        }

        let paths = &openapi.paths.paths;
        for path in [
            "/health",
            "/api/v1/sessions",
            "/api/v1/sessions/{id}",
            "/api/v1/sessions/{id}/reset",
            "/api/v1/sessions/{id}/profile",
            "/api/v1/sessions/{id}/conversation",
            "/api/v1/sessions/{id}/health-data",
            "/api/v1/sessions/{id}/health-data/document",
            "/api/v1/sessions/{id}/analytics",
            "/api/v1/sessions/{id}/analytics/summary",
            "/api/v1/sessions/{id}/analytics/insights",
            "/api/v1/sessions/{id}/predictions",
            "/api/v1/sessions/{id}/treatment-plans",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_schemas_include_report_types() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components should be defined");

        assert!(components.schemas.contains_key("HealthReport"));
        assert!(components.schemas.contains_key("SessionView"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
