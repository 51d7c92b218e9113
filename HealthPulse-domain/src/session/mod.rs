//! Per-session state: patient profile, conversation history and the current health series.
//!
//! A `SessionState` is an explicit value owned by whoever drives the session. There is no
//! process-wide instance; the API layer keeps one per session id.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use health_pulse_data::models::HealthSeries;
use health_pulse_data::synthetic::{generate_with_seed, SyntheticProfile};

use crate::entities::conversation::{ConversationTurn, Role};
use crate::entities::profile::{PatientProfile, ProfileField};

/// Session errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// A profile field failed validation
    #[error("Validation error: {0}")]
    Validation(String),
}

/// State of one user session
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    created_at: DateTime<Utc>,
    profile: PatientProfile,
    conversation: Vec<ConversationTurn>,
    series: Option<Arc<HealthSeries>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh session with the default profile, no turns and no series
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            profile: PatientProfile::default(),
            conversation: Vec::new(),
            series: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn profile(&self) -> &PatientProfile {
        &self.profile
    }

    pub fn conversation(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    /// Clear profile, conversation and series back to their initial values.
    /// The session keeps its id.
    pub fn reset(&mut self) {
        self.profile = PatientProfile::default();
        self.conversation.clear();
        self.series = None;
        info!("Session {} reset", self.id);
    }

    /// Set one profile field from its text form.
    ///
    /// The change is applied to a copy and validated first; on error the stored profile
    /// is left exactly as it was.
    pub fn update_profile(&mut self, field: ProfileField, value: &str) -> Result<(), SessionError> {
        let mut candidate = self.profile.clone();

        match field {
            ProfileField::Name => candidate.name = value.to_string(),
            ProfileField::Age => {
                candidate.age = value.trim().parse().map_err(|_| {
                    SessionError::Validation(format!("age: '{}' is not a whole number of years", value))
                })?
            }
            ProfileField::Gender => {
                candidate.gender = value
                    .parse()
                    .map_err(|e: String| SessionError::Validation(format!("gender: {}", e)))?
            }
            ProfileField::MedicalHistory => candidate.medical_history = value.to_string(),
            ProfileField::CurrentMedications => candidate.current_medications = value.to_string(),
            ProfileField::Allergies => candidate.allergies = value.to_string(),
            ProfileField::EmergencyContact => candidate.emergency_contact = value.to_string(),
        }

        self.set_profile(candidate)
    }

    /// Replace the whole profile after validating it
    pub fn set_profile(&mut self, profile: PatientProfile) -> Result<(), SessionError> {
        profile
            .validate()
            .map_err(|errors| SessionError::Validation(validation_message(&errors)))?;

        self.profile = profile;
        debug!("Session {} profile updated", self.id);
        Ok(())
    }

    /// Percentage of core profile fields filled in
    pub fn profile_completeness(&self) -> u8 {
        self.profile.completeness()
    }

    /// Append a successful turn
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) -> &ConversationTurn {
        self.push(ConversationTurn::new(role, content))
    }

    /// Append an assistant turn marking a failed model call
    pub fn append_failed_turn(&mut self, description: impl Into<String>) -> &ConversationTurn {
        self.push(ConversationTurn::failure(description))
    }

    /// Append turns recorded elsewhere, keeping their timestamps and status
    pub fn extend_conversation(&mut self, turns: impl IntoIterator<Item = ConversationTurn>) {
        self.conversation.extend(turns);
    }

    fn push(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        self.conversation.push(turn);
        &self.conversation[self.conversation.len() - 1]
    }

    /// Current series, if any. The returned handle is a stable snapshot:
    /// later replacements do not affect it.
    pub fn series(&self) -> Option<Arc<HealthSeries>> {
        self.series.clone()
    }

    /// Swap in a new series, discarding the previous one
    pub fn replace_series(&mut self, series: HealthSeries) -> Arc<HealthSeries> {
        let series = Arc::new(series);
        self.series = Some(Arc::clone(&series));
        info!("Session {} series replaced ({} records)", self.id, series.len());
        series
    }

    /// Current series, generating the seeded demo series when none exists yet
    pub fn ensure_series(&mut self, seed: u64, end_date: NaiveDate) -> Arc<HealthSeries> {
        match &self.series {
            Some(series) => Arc::clone(series),
            None => {
                debug!("Session {} has no series; generating demo data", self.id);
                self.replace_series(generate_with_seed(SyntheticProfile::DemoTrend, end_date, seed))
            }
        }
    }
}

/// Flatten validator errors into one message
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::profile::Gender;
    use health_pulse_data::models::HealthRecord;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn one_row_series(heart_rate: f64) -> HealthSeries {
        HealthSeries::from_records(vec![HealthRecord::new(end(), heart_rate, 120.0, 80.0, 90.0)]).unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let session = SessionState::new();
        assert_eq!(session.profile(), &PatientProfile::default());
        assert!(session.conversation().is_empty());
        assert!(session.series().is_none());
    }

    #[test]
    fn test_update_profile_fields() {
        let mut session = SessionState::new();
        session.update_profile(ProfileField::Name, "Grace").unwrap();
        session.update_profile(ProfileField::Age, " 42 ").unwrap();
        session.update_profile(ProfileField::Gender, "female").unwrap();
        session.update_profile(ProfileField::Allergies, "  pollen, dust  ").unwrap();

        let profile = session.profile();
        assert_eq!(profile.name, "Grace");
        assert_eq!(profile.age, 42);
        assert_eq!(profile.gender, Gender::Female);
        // Free text is stored unchanged
        assert_eq!(profile.allergies, "  pollen, dust  ");
    }

    #[test]
    fn test_invalid_age_leaves_state_unchanged() {
        let mut session = SessionState::new();
        session.update_profile(ProfileField::Name, "Grace").unwrap();
        let before = session.profile().clone();

        let err = session.update_profile(ProfileField::Age, "150").unwrap_err();
        assert!(matches!(err, SessionError::Validation(ref msg) if msg.contains("age")));
        assert_eq!(session.profile(), &before);

        assert!(session.update_profile(ProfileField::Age, "0").is_err());
        assert!(session.update_profile(ProfileField::Age, "forty").is_err());
        assert_eq!(session.profile(), &before);
    }

    #[test]
    fn test_invalid_gender_rejected() {
        let mut session = SessionState::new();
        let err = session.update_profile(ProfileField::Gender, "unknown").unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(session.profile().gender, Gender::Male);
    }

    #[test]
    fn test_append_turn_preserves_history() {
        let mut session = SessionState::new();
        session.append_turn(Role::User, "Hello");
        session.append_turn(Role::Assistant, "Hi there");
        session.append_failed_turn("Model call timed out");

        let turns = session.conversation();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].content, "Hello");
        assert_eq!(turns[1].role, Role::Assistant);
        assert!(turns[2].is_failure());
    }

    #[test]
    fn test_extend_conversation_keeps_turns_as_recorded() {
        let mut worker = SessionState::new();
        worker.append_turn(Role::User, "Question");
        worker.append_failed_turn("Provider unavailable");

        let mut stored = SessionState::new();
        stored.append_turn(Role::User, "Earlier");
        stored.extend_conversation(worker.conversation().iter().cloned());

        let turns = stored.conversation();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1], worker.conversation()[0]);
        assert!(turns[2].is_failure());
    }

    #[test]
    fn test_replace_series_is_atomic_for_readers() {
        let mut session = SessionState::new();
        session.replace_series(one_row_series(70.0));

        let reader = session.series().unwrap();
        session.replace_series(one_row_series(99.0));

        // The earlier snapshot still sees the whole old series, new reads see the new one
        assert_eq!(reader.records()[0].heart_rate, 70.0);
        assert_eq!(session.series().unwrap().records()[0].heart_rate, 99.0);
    }

    #[test]
    fn test_ensure_series_generates_once() {
        let mut session = SessionState::new();
        let first = session.ensure_series(42, end());
        assert_eq!(first.len(), 91);

        let second = session.ensure_series(7, end());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionState::new();
        let id = session.id();
        session.update_profile(ProfileField::Name, "Grace").unwrap();
        session.append_turn(Role::User, "Hello");
        session.replace_series(one_row_series(70.0));

        session.reset();

        assert_eq!(session.id(), id);
        assert_eq!(session.profile(), &PatientProfile::default());
        assert!(session.conversation().is_empty());
        assert!(session.series().is_none());
    }

    #[test]
    fn test_profile_completeness() {
        let mut session = SessionState::new();
        assert_eq!(session.profile_completeness(), 33);
        session.update_profile(ProfileField::Name, "Grace").unwrap();
        assert_eq!(session.profile_completeness(), 50);
    }
}
