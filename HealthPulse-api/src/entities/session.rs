use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use health_pulse_domain::entities::{ConversationTurn, PatientProfile, ProfileField};
use health_pulse_domain::session::SessionState;

/// Public view of a session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub profile: PatientProfile,

    /// Percentage of core profile fields filled in
    pub profile_completeness: u8,

    /// Number of conversation turns
    pub turn_count: usize,

    /// Summary of the current health series, if one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_data: Option<SeriesSummary>,
}

/// Size and date range of a health series
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeriesSummary {
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl From<&SessionState> for SessionView {
    fn from(session: &SessionState) -> Self {
        Self {
            id: session.id(),
            created_at: session.created_at(),
            profile: session.profile().clone(),
            profile_completeness: session.profile_completeness(),
            turn_count: session.conversation().len(),
            health_data: session.series().map(|series| SeriesSummary {
                record_count: series.len(),
                first_date: series.first_date(),
                last_date: series.last_date(),
            }),
        }
    }
}

/// Change one profile field
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// Field to change
    pub field: ProfileField,

    /// New value; numbers are accepted for `age`
    #[schema(value_type = String, example = "42")]
    pub value: serde_json::Value,
}

impl UpdateProfileRequest {
    /// The value in the text form the session expects
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

/// Conversation history
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationResponse {
    pub turns: Vec<ConversationTurn>,
}

/// Question for the chat assistant
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
}

/// Answer to a chat question
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,

    /// Full conversation after the exchange
    pub turns: Vec<ConversationTurn>,
}
