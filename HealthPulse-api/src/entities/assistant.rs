use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use health_pulse_domain::prompts::TreatmentRequest;

/// Symptoms to assess
#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictionRequest {
    pub symptoms: String,
}

/// Condition to plan treatment for
#[derive(Debug, Deserialize, ToSchema)]
pub struct TreatmentPlanRequest {
    pub condition: String,
    pub severity: Option<String>,
    pub duration: Option<String>,
}

impl From<TreatmentPlanRequest> for TreatmentRequest {
    fn from(request: TreatmentPlanRequest) -> Self {
        TreatmentRequest {
            condition: request.condition,
            severity: request.severity,
            duration: request.duration,
        }
    }
}

/// Text produced by the response provider
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratedTextResponse {
    pub text: String,

    /// Provider that produced the text
    pub provider: String,
}
