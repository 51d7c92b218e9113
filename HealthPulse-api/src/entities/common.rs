use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use health_pulse_data::ingest::IngestError;
use health_pulse_data::repository::RepositoryError;
use health_pulse_domain::services::{AnalyticsError, AssistantError};
use health_pulse_domain::session::SessionError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self::new("not_found", format!("The requested {} could not be found", resource))
    }

    /// Create a validation error response
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create a bad request error response
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    /// Not enough data to compute the requested statistics
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new("insufficient_data", message)
    }

    /// The text-generation service failed
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new("external_service_error", message)
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "insufficient_data" => StatusCode::UNPROCESSABLE_ENTITY,
            "external_service_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<RepositoryError> for ErrorResponse {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ErrorResponse::not_found("session"),
            RepositoryError::Lock(msg) => {
                error!("Session store error: {}", msg);
                ErrorResponse::internal_error()
            }
        }
    }
}

impl From<SessionError> for ErrorResponse {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(msg) => ErrorResponse::validation_error(msg),
        }
    }
}

impl From<AnalyticsError> for ErrorResponse {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InsufficientData(msg) => ErrorResponse::insufficient_data(msg),
        }
    }
}

impl From<AssistantError> for ErrorResponse {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Validation(msg) => ErrorResponse::validation_error(msg),
            AssistantError::ExternalService(e) => ErrorResponse::external_service(e.to_string()),
        }
    }
}

impl From<IngestError> for ErrorResponse {
    fn from(err: IngestError) -> Self {
        ErrorResponse::bad_request(err.to_string())
    }
}
