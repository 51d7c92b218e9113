pub mod handlers;
pub mod routes;

use axum::Router;

use crate::state::AppState;

/// Create the application router
pub fn create_application(state: AppState) -> Router {
    routes::create_app(state)
}
