use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use health_pulse_data::ingest::parse_health_csv;
use health_pulse_data::models::HealthSeries;
use health_pulse_data::synthetic::{generate_with_seed, SyntheticProfile};

use crate::entities::analytics::HealthReport;
use crate::entities::conversation::Role;
use crate::prompts::{self, HealthContext, TreatmentRequest};
use crate::providers::{ProviderError, ResponseProvider};
use crate::session::SessionState;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Assistant service errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssistantError {
    /// The request text was unusable
    #[error("Validation error: {0}")]
    Validation(String),

    /// The model call failed
    #[error("External service error: {0}")]
    ExternalService(#[from] ProviderError),
}

/// How an extracted series was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Parsed from the model's reply
    Extracted,
    /// Seeded sample data used in place of an extraction
    Synthetic,
}

/// Series recovered from a document
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub series: HealthSeries,
    pub method: ExtractionMethod,
}

/// Orchestrates prompts, the response provider and session updates
#[derive(Clone)]
pub struct AssistantService {
    provider: Arc<dyn ResponseProvider>,
}

impl AssistantService {
    pub fn new(provider: Arc<dyn ResponseProvider>) -> Self {
        Self { provider }
    }

    /// Name of the provider answering requests
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Answer a chat question and record both turns.
    ///
    /// A failed model call records a failed assistant turn instead of an answer.
    /// Profile and series are never touched.
    #[instrument(skip(self, session, question), fields(session_id = %session.id()))]
    pub async fn ask(&self, session: &mut SessionState, question: &str) -> Result<String, AssistantError> {
        require_text("question", question)?;

        session.append_turn(Role::User, question);
        let context = recent_context(session);
        let prompt = prompts::chat(session.profile(), context.as_ref(), question);

        match self.provider.generate(&prompt).await {
            Ok(answer) => {
                session.append_turn(Role::Assistant, answer.clone());
                Ok(answer)
            }
            Err(e) => {
                warn!("Chat generation failed: {}", e);
                session.append_failed_turn(format!("The assistant could not answer: {}", e));
                Err(e.into())
            }
        }
    }

    /// Likely conditions for the reported symptoms
    #[instrument(skip_all)]
    pub async fn predict_disease(&self, session: &SessionState, symptoms: &str) -> Result<String, AssistantError> {
        require_text("symptoms", symptoms)?;
        let context = recent_context(session);
        let prompt = prompts::disease_prediction(session.profile(), context.as_ref(), symptoms);
        Ok(self.provider.generate(&prompt).await?)
    }

    /// Treatment plan for a condition
    #[instrument(skip_all)]
    pub async fn treatment_plan(
        &self,
        session: &SessionState,
        request: &TreatmentRequest,
    ) -> Result<String, AssistantError> {
        require_text("condition", &request.condition)?;
        let context = recent_context(session);
        let prompt = prompts::treatment_plan(session.profile(), context.as_ref(), request);
        Ok(self.provider.generate(&prompt).await?)
    }

    /// Narrative analysis of a computed report
    #[instrument(skip_all)]
    pub async fn analyze_health(&self, session: &SessionState, report: &HealthReport) -> Result<String, AssistantError> {
        let prompt = prompts::health_analysis(session.profile(), report);
        Ok(self.provider.generate(&prompt).await?)
    }

    /// Recover a health series from document text.
    ///
    /// The model is asked for CSV in the upload format. When the call fails or the reply
    /// yields no usable rows, a seeded sample series ending at `end_date` is returned instead.
    #[instrument(skip(self, document_text), fields(chars = document_text.len()))]
    pub async fn extract_series(&self, document_text: &str, seed: u64, end_date: NaiveDate) -> ExtractionOutcome {
        let prompt = prompts::record_extraction(document_text);

        match self.provider.generate(&prompt).await {
            Ok(reply) => match parse_health_csv(strip_code_fence(&reply).as_bytes()) {
                Ok(report) if !report.series.is_empty() => {
                    info!(
                        "Extracted {} records ({} rows rejected)",
                        report.accepted_rows(),
                        report.rejected.len()
                    );
                    return ExtractionOutcome {
                        series: report.series,
                        method: ExtractionMethod::Extracted,
                    };
                }
                Ok(_) => warn!("Extraction reply held no usable rows"),
                Err(e) => warn!("Extraction reply was not usable CSV: {}", e),
            },
            Err(e) => warn!("Extraction call failed: {}", e),
        }

        info!("Falling back to sample data for document");
        ExtractionOutcome {
            series: generate_with_seed(SyntheticProfile::DocumentSample, end_date, seed),
            method: ExtractionMethod::Synthetic,
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AssistantError> {
    if value.trim().is_empty() {
        return Err(AssistantError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn recent_context(session: &SessionState) -> Option<HealthContext> {
    session
        .series()
        .and_then(|series| HealthContext::from_series(&series))
}

/// Drop a surrounding markdown code fence, if the model added one
fn strip_code_fence(reply: &str) -> String {
    reply
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}
