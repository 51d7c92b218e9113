//! Prompt construction for the text-generation collaborator.
//!
//! Every prompt opens with a fixed line naming its kind, so a provider can tell the
//! request types apart without parsing the rest.

use serde::{Deserialize, Serialize};

use health_pulse_data::models::{HealthSeries, Metric};

use crate::entities::analytics::{HealthReport, Window};
use crate::entities::profile::PatientProfile;
use crate::services::aggregator;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Longest document excerpt sent for record extraction, in characters
pub const EXTRACTION_CHAR_LIMIT: usize = 2000;

const NOT_SPECIFIED: &str = "Not specified";
const NONE_REPORTED: &str = "None reported";

/// Kind of request a prompt carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Chat,
    DiseasePrediction,
    TreatmentPlan,
    HealthAnalysis,
    RecordExtraction,
}

impl PromptKind {
    pub const ALL: [PromptKind; 5] = [
        PromptKind::Chat,
        PromptKind::DiseasePrediction,
        PromptKind::TreatmentPlan,
        PromptKind::HealthAnalysis,
        PromptKind::RecordExtraction,
    ];

    /// First line of every prompt of this kind
    pub fn opening(&self) -> &'static str {
        match self {
            PromptKind::Chat => {
                "You are a knowledgeable healthcare assistant answering a patient's question."
            }
            PromptKind::DiseasePrediction => {
                "You are a medical assistant performing a diagnostic assessment of reported symptoms."
            }
            PromptKind::TreatmentPlan => {
                "You are a medical assistant drafting a personalized treatment plan."
            }
            PromptKind::HealthAnalysis => {
                "You are a medical assistant analyzing a patient's recorded health data."
            }
            PromptKind::RecordExtraction => {
                "You are extracting daily health measurements from a medical document."
            }
        }
    }

    /// Kind of a prompt built by this module
    pub fn detect(prompt: &str) -> Option<PromptKind> {
        let first_line = prompt.lines().next()?.trim();
        PromptKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.opening() == first_line)
    }
}

/// Means of the last seven rows, quoted to the model as recent context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthContext {
    pub heart_rate: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub blood_glucose: f64,
    pub temperature: Option<f64>,
}

impl HealthContext {
    /// Context from the most recent week, or `None` for an empty series
    pub fn from_series(series: &HealthSeries) -> Option<Self> {
        let recent = aggregator::snapshot(series, Window::RECENT_WEEK).ok()?;
        Some(Self {
            heart_rate: recent.mean(Metric::HeartRate)?,
            systolic_bp: recent.mean(Metric::SystolicBp)?,
            diastolic_bp: recent.mean(Metric::DiastolicBp)?,
            blood_glucose: recent.mean(Metric::BloodGlucose)?,
            temperature: recent.mean(Metric::Temperature),
        })
    }

    fn render(&self) -> String {
        let mut lines = vec![
            "Recent health data (last 7 days):".to_string(),
            format!("- Average heart rate: {:.1} {}", self.heart_rate, Metric::HeartRate.unit()),
            format!(
                "- Average blood pressure: {:.1}/{:.1} {}",
                self.systolic_bp,
                self.diastolic_bp,
                Metric::SystolicBp.unit()
            ),
            format!("- Average blood glucose: {:.1} {}", self.blood_glucose, Metric::BloodGlucose.unit()),
        ];
        if let Some(temperature) = self.temperature {
            lines.push(format!("- Average temperature: {:.1}{}", temperature, Metric::Temperature.unit()));
        }
        lines.join("\n")
    }
}

/// Optional detail for a treatment plan request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRequest {
    pub condition: String,
    pub severity: Option<String>,
    pub duration: Option<String>,
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn profile_block(profile: &PatientProfile, include_name: bool) -> String {
    let mut lines = vec!["Patient profile:".to_string()];
    if include_name {
        lines.push(format!("- Name: {}", or_default(&profile.name, NOT_SPECIFIED)));
    }
    lines.push(format!("- Age: {}", profile.age));
    lines.push(format!("- Gender: {}", profile.gender));
    lines.push(format!(
        "- Medical history: {}",
        or_default(&profile.medical_history, NONE_REPORTED)
    ));
    lines.push(format!(
        "- Current medications: {}",
        or_default(&profile.current_medications, NONE_REPORTED)
    ));
    lines.push(format!("- Allergies: {}", or_default(&profile.allergies, NONE_REPORTED)));
    lines.join("\n")
}

fn assemble(kind: PromptKind, sections: Vec<String>) -> String {
    let mut parts = vec![kind.opening().to_string()];
    parts.extend(sections.into_iter().filter(|section| !section.is_empty()));
    parts.join("\n\n")
}

fn context_block(context: Option<&HealthContext>) -> String {
    context.map(HealthContext::render).unwrap_or_default()
}

/// Free-form question from the chat panel
pub fn chat(profile: &PatientProfile, context: Option<&HealthContext>, question: &str) -> String {
    assemble(
        PromptKind::Chat,
        vec![
            "Respond as a doctor would: clear, empathetic and medically accurate.".to_string(),
            profile_block(profile, true),
            context_block(context),
            format!("Patient question: {}", question),
            [
                "In your answer:",
                "1. Address the question directly",
                "2. Take the profile and recent health data into account",
                "3. Say when professional care should be sought",
                "4. Acknowledge the limits of automated medical advice",
            ]
            .join("\n"),
            "Response:".to_string(),
        ],
    )
}

/// Diagnostic assessment of reported symptoms
pub fn disease_prediction(
    profile: &PatientProfile,
    context: Option<&HealthContext>,
    symptoms: &str,
) -> String {
    assemble(
        PromptKind::DiseasePrediction,
        vec![
            profile_block(profile, false),
            context_block(context),
            format!("Reported symptoms: {}", symptoms),
            [
                "Provide:",
                "1. The three most likely conditions, each with a likelihood (high/medium/low) and a short explanation",
                "2. Recommended next steps, including tests to consider",
                "3. Red flags that need immediate medical care",
                "",
                "This assessment is informational and does not replace a professional diagnosis.",
            ]
            .join("\n"),
            "Analysis:".to_string(),
        ],
    )
}

/// Personalized treatment plan for a condition
pub fn treatment_plan(
    profile: &PatientProfile,
    context: Option<&HealthContext>,
    request: &TreatmentRequest,
) -> String {
    let mut condition = vec![format!("Medical condition: {}", request.condition)];
    if let Some(severity) = request.severity.as_deref().filter(|s| !s.trim().is_empty()) {
        condition.push(format!("Severity: {}", severity));
    }
    if let Some(duration) = request.duration.as_deref().filter(|s| !s.trim().is_empty()) {
        condition.push(format!("Duration: {}", duration));
    }

    assemble(
        PromptKind::TreatmentPlan,
        vec![
            profile_block(profile, true),
            context_block(context),
            condition.join("\n"),
            [
                "Cover:",
                "1. Medication options with typical dosages and interaction concerns",
                "2. Lifestyle changes: diet, exercise, sleep and stress",
                "3. Follow-up schedule and monitoring",
                "4. Warning signs that need immediate attention",
                "",
                "The plan must be reviewed by a qualified healthcare provider before use.",
            ]
            .join("\n"),
            "Treatment plan:".to_string(),
        ],
    )
}

/// Narrative analysis of a computed health report
pub fn health_analysis(profile: &PatientProfile, report: &HealthReport) -> String {
    let overall = &report.overall;
    let range = |metric: Metric| {
        overall
            .get(metric)
            .map(|s| format!("{:.1} {} (range {:.1}-{:.1})", s.mean, metric.unit(), s.min, s.max))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    };
    let versus = |metric: Metric| match report.trend(metric) {
        Some(trend) => match (trend.recent_mean, trend.previous_mean) {
            (Some(recent), Some(previous)) => format!("{:.1} vs {:.1}", recent, previous),
            _ => "not enough data".to_string(),
        },
        None => "not enough data".to_string(),
    };

    let summary = [
        format!("Health data summary ({} days):", overall.row_count),
        format!("- Heart rate: {}", range(Metric::HeartRate)),
        format!(
            "- Blood pressure: {:.1}/{:.1} {}",
            report.insights.avg_systolic,
            report.insights.avg_diastolic,
            Metric::SystolicBp.unit()
        ),
        format!("- Blood glucose: {}", range(Metric::BloodGlucose)),
        format!("- Health score: {}", report.score),
    ]
    .join("\n");

    let trends = [
        "Recent trends (last 7 days vs previous 7 days):".to_string(),
        format!("- Heart rate: {}", versus(Metric::HeartRate)),
        format!("- Systolic BP: {}", versus(Metric::SystolicBp)),
        format!("- Blood glucose: {}", versus(Metric::BloodGlucose)),
    ]
    .join("\n");

    assemble(
        PromptKind::HealthAnalysis,
        vec![
            profile_block(profile, true),
            summary,
            trends,
            [
                "Provide an overall assessment, trend analysis, areas of concern,",
                "personalized recommendations and when to seek medical attention.",
            ]
            .join("\n"),
            "Analysis:".to_string(),
        ],
    )
}

/// Ask for the document's measurements as CSV in the upload format
pub fn record_extraction(document_text: &str) -> String {
    let excerpt: String = document_text.chars().take(EXTRACTION_CHAR_LIMIT).collect();
    let header = std::iter::once("date")
        .chain(Metric::ALL.iter().map(|metric| metric.column()))
        .collect::<Vec<_>>()
        .join(",");

    assemble(
        PromptKind::RecordExtraction,
        vec![
            format!("Document text:\n{}", excerpt),
            format!(
                "Return only CSV with this exact header and one row per day:\n{}\nDates as YYYY-MM-DD. Leave a cell empty when the value is not in the document.",
                header
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::profile::Gender;
    use chrono::{Duration, NaiveDate};
    use health_pulse_data::models::HealthRecord;

    fn profile() -> PatientProfile {
        PatientProfile {
            name: "Grace".to_string(),
            age: 54,
            gender: Gender::Female,
            allergies: "Penicillin".to_string(),
            ..PatientProfile::default()
        }
    }

    fn series(days: i64) -> HealthSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        HealthSeries::from_records(
            (0..days)
                .map(|i| HealthRecord::new(start + Duration::days(i), 70.0 + i as f64, 120.0, 80.0, 90.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_detect_every_kind() {
        let profile = profile();
        let request = TreatmentRequest { condition: "Hypertension".to_string(), ..Default::default() };

        assert_eq!(PromptKind::detect(&chat(&profile, None, "Hi")), Some(PromptKind::Chat));
        assert_eq!(
            PromptKind::detect(&disease_prediction(&profile, None, "cough")),
            Some(PromptKind::DiseasePrediction)
        );
        assert_eq!(
            PromptKind::detect(&treatment_plan(&profile, None, &request)),
            Some(PromptKind::TreatmentPlan)
        );
        assert_eq!(PromptKind::detect(&record_extraction("bp 120/80")), Some(PromptKind::RecordExtraction));
        assert_eq!(PromptKind::detect("Tell me a joke"), None);
    }

    #[test]
    fn test_chat_includes_profile_and_defaults() {
        let prompt = chat(&profile(), None, "Is my blood pressure fine?");
        assert!(prompt.contains("- Name: Grace"));
        assert!(prompt.contains("- Gender: Female"));
        assert!(prompt.contains("- Medical history: None reported"));
        assert!(prompt.contains("- Allergies: Penicillin"));
        assert!(prompt.contains("Patient question: Is my blood pressure fine?"));
        assert!(!prompt.contains("Recent health data"));
    }

    #[test]
    fn test_context_uses_last_seven_rows() {
        let context = HealthContext::from_series(&series(10)).unwrap();
        // Heart rates 73..=79 for the last seven days
        assert!((context.heart_rate - 76.0).abs() < 1e-9);
        assert_eq!(context.temperature, None);

        let prompt = disease_prediction(&profile(), Some(&context), "headache");
        assert!(prompt.contains("Average heart rate: 76.0 bpm"));
        assert!(prompt.contains("120.0/80.0 mmHg"));
        assert!(!prompt.contains("- Name:"));

        assert!(HealthContext::from_series(&HealthSeries::empty()).is_none());
    }

    #[test]
    fn test_health_analysis_states_units() {
        use crate::services::analytics::{AnalyticsService, AnalyticsServiceTrait};

        let report = AnalyticsService::new().report(&series(14)).unwrap();
        let prompt = health_analysis(&profile(), &report);

        assert_eq!(PromptKind::detect(&prompt), Some(PromptKind::HealthAnalysis));
        assert!(prompt.contains("Health data summary (14 days):"));
        assert!(prompt.contains("- Heart rate: 76.5 bpm (range 70.0-83.0)"));
        assert!(prompt.contains("- Blood pressure: 120.0/80.0 mmHg"));
        assert!(prompt.contains("- Blood glucose: 90.0 mg/dL (range 90.0-90.0)"));
        assert!(prompt.contains("- Heart rate: 80.0 vs 73.0"));
    }

    #[test]
    fn test_treatment_plan_optional_details() {
        let request = TreatmentRequest {
            condition: "Type 2 diabetes".to_string(),
            severity: Some("Moderate".to_string()),
            duration: Some("  ".to_string()),
        };
        let prompt = treatment_plan(&profile(), None, &request);
        assert!(prompt.contains("Medical condition: Type 2 diabetes"));
        assert!(prompt.contains("Severity: Moderate"));
        assert!(!prompt.contains("Duration:"));
    }

    #[test]
    fn test_record_extraction_truncates_document() {
        let document = "é".repeat(EXTRACTION_CHAR_LIMIT + 500);
        let prompt = record_extraction(&document);
        assert_eq!(prompt.matches('é').count(), EXTRACTION_CHAR_LIMIT);
        assert!(prompt.contains("date,heart_rate,systolic_bp,diastolic_bp,blood_glucose,temperature,weight,sleep_hours"));
    }
}
