use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::api::handlers::{self, health};
use crate::openapi::configure_swagger_routes;
use crate::state::AppState;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Specific session routes come before the parametrized ones
    let api_routes = Router::new()
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/reset", post(handlers::reset_session))
        .route("/sessions/:id/profile", patch(handlers::update_profile))
        .route(
            "/sessions/:id/conversation",
            get(handlers::get_conversation).post(handlers::ask_question),
        )
        .route("/sessions/:id/health-data", post(handlers::upload_health_data))
        .route("/sessions/:id/health-data/document", post(handlers::upload_document))
        .route("/sessions/:id/analytics", get(handlers::get_analytics))
        .route("/sessions/:id/analytics/summary", get(handlers::get_metric_summary))
        .route("/sessions/:id/analytics/insights", post(handlers::generate_health_insights))
        .route("/sessions/:id/predictions", post(handlers::predict_disease))
        .route("/sessions/:id/treatment-plans", post(handlers::create_treatment_plan));

    debug!("API routes configured");

    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state);

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app.layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
