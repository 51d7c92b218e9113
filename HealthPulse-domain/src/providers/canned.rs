use std::sync::Mutex;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::{ProviderError, ResponseProvider};
use crate::prompts::PromptKind;

const CHAT_RESPONSES: &[&str] = &[
    "Thank you for your question. Based on your profile, the most useful next step is to keep a short daily log of the symptom you describe: when it starts, how long it lasts and what eases it. Stay well hydrated, keep regular sleep hours and avoid skipping meals. If the symptom worsens, appears suddenly, or comes with chest pain, shortness of breath or confusion, seek medical care promptly. This information is general guidance and does not replace an examination by your doctor.",
    "That is a common concern. Many people notice changes like this with stress, poor sleep or changes in diet. Your recent readings do not by themselves point to an emergency, but they are worth tracking over the next one to two weeks. Bring your log to your next appointment so your clinician can look at the pattern. Seek urgent care if you develop severe pain, fainting or difficulty breathing. Automated advice has limits, so please confirm any decisions with a healthcare professional.",
    "Good question. Regular physical activity, a diet rich in vegetables and whole grains, limited salt and alcohol, and seven to eight hours of sleep support heart rate, blood pressure and glucose control together. Review your current medications with a pharmacist if you start any new supplement. Contact your doctor if your readings stay outside the normal range for more than a few days. This answer is informational only.",
];

const PREDICTION_RESPONSES: &[&str] = &[
    "Top 3 most likely conditions:\n1. Viral upper respiratory infection (likelihood: high). Symptoms of this kind usually resolve within 7 to 10 days with rest and fluids.\n2. Seasonal allergies (likelihood: medium). Consider if symptoms recur at the same time each year.\n3. Early bacterial sinusitis (likelihood: low). More likely if symptoms last beyond 10 days or worsen after improving.\n\nRecommended next steps: rest, fluids, monitor temperature twice daily, and book a visit if there is no improvement within a week.\n\nRed flags: high fever above 103°F, difficulty breathing, chest pain or confusion need immediate care.\n\nThis assessment is informational and does not replace a professional diagnosis.",
    "Top 3 most likely conditions:\n1. Tension-type headache (likelihood: high). Often linked with stress, posture and poor sleep.\n2. Migraine (likelihood: medium). Consider if headaches are one-sided, throbbing or come with light sensitivity.\n3. Dehydration (likelihood: medium). Check daily fluid intake.\n\nRecommended next steps: keep a headache diary, limit screen time, maintain regular meals and fluids, and discuss recurring episodes with your doctor.\n\nRed flags: sudden severe headache, weakness, vision loss or a stiff neck with fever need emergency evaluation.\n\nThis assessment is informational and does not replace a professional diagnosis.",
];

const TREATMENT_RESPONSES: &[&str] = &[
    "Treatment plan\n\n1. Medication: follow the regimen agreed with your doctor and do not change doses without advice. Check new medicines against your allergy list.\n2. Lifestyle: aim for 150 minutes of moderate activity per week, reduce salt and processed food, keep alcohol low and sleep seven to eight hours.\n3. Follow-up: review with your clinician in 4 to 6 weeks, with home monitoring of the relevant readings in between.\n4. Warning signs: seek immediate care for chest pain, severe shortness of breath, fainting or sudden weakness.\n\nThis plan must be reviewed by a qualified healthcare provider before use.",
    "Treatment plan\n\n1. Medication: first-line therapy is usually chosen by your doctor based on severity. Keep an up-to-date medication list and bring it to every appointment.\n2. Diet: favor vegetables, legumes, whole grains and lean protein; limit sugary drinks and refined carbohydrates.\n3. Activity: start with 20 minute walks and build up gradually; stop if you feel dizzy or have chest discomfort.\n4. Follow-up: schedule a review within a month and repeat relevant lab tests as advised.\n\nThis plan must be reviewed by a qualified healthcare provider before use.",
];

const ANALYSIS_RESPONSES: &[&str] = &[
    "Overall assessment: your readings are broadly stable over the recorded period. Heart rate and blood pressure stay close to their averages, with no sustained upward trend in the last week. Keep up regular activity and sleep, continue monitoring, and discuss any reading persistently outside the normal range with your doctor.",
    "Overall assessment: most values fall within expected ranges, though day-to-day variation in glucose suggests meal timing and composition are worth reviewing. Recent weekly averages are similar to the previous week. Consider a follow-up if glucose averages climb above 100 mg/dL or blood pressure stays above 130/80 mmHg.",
];

const EXTRACTION_RESPONSES: &[&str] = &[
    "The document describes routine vital sign checks including heart rate, blood pressure and blood glucose. Individual daily values could not be reliably separated from the narrative text.",
];

/// Provider answering from fixed response sets, chosen per prompt kind with a seeded RNG
pub struct CannedResponseProvider {
    rng: Mutex<ChaCha8Rng>,
}

impl CannedResponseProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn responses(kind: Option<PromptKind>) -> &'static [&'static str] {
        match kind {
            Some(PromptKind::DiseasePrediction) => PREDICTION_RESPONSES,
            Some(PromptKind::TreatmentPlan) => TREATMENT_RESPONSES,
            Some(PromptKind::HealthAnalysis) => ANALYSIS_RESPONSES,
            Some(PromptKind::RecordExtraction) => EXTRACTION_RESPONSES,
            Some(PromptKind::Chat) | None => CHAT_RESPONSES,
        }
    }
}

#[async_trait]
impl ResponseProvider for CannedResponseProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let kind = PromptKind::detect(prompt);
        let responses = Self::responses(kind);

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let response = responses
            .choose(&mut *rng)
            .ok_or_else(|| ProviderError::InvalidResponse("no canned responses".to_string()))?;

        debug!("Canned response for {:?}", kind);
        Ok(response.to_string())
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}
