use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Heart rate category from the mean resting rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum HeartRateCategory {
    /// Mean below 60 bpm
    #[serde(rename = "below normal")]
    BelowNormal,

    /// Mean from 60 to 100 bpm inclusive
    #[serde(rename = "normal")]
    Normal,

    /// Mean above 100 bpm
    #[serde(rename = "above normal")]
    AboveNormal,
}

impl HeartRateCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HeartRateCategory::BelowNormal => "below normal",
            HeartRateCategory::Normal => "normal",
            HeartRateCategory::AboveNormal => "above normal",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            HeartRateCategory::BelowNormal => {
                "Heart rate is below the normal range and may indicate bradycardia. Consider consulting a cardiologist."
            }
            HeartRateCategory::Normal => {
                "Heart rate is within the normal range (60-100 bpm)."
            }
            HeartRateCategory::AboveNormal => {
                "Heart rate is above the normal range and may indicate tachycardia. Monitor stress levels and caffeine intake."
            }
        }
    }
}

/// Blood pressure category from mean systolic and diastolic pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureCategory {
    /// Systolic at most 130 and diastolic at most 80
    #[serde(rename = "normal")]
    Normal,

    /// Systolic above 130 (up to 140) or diastolic above 80 (up to 90)
    #[serde(rename = "stage 1")]
    Stage1,

    /// Systolic above 140 or diastolic above 90
    #[serde(rename = "elevated")]
    Elevated,
}

impl BloodPressureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "normal",
            BloodPressureCategory::Stage1 => "stage 1",
            BloodPressureCategory::Elevated => "elevated",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => {
                "Blood pressure is within the normal range. Continue healthy lifestyle habits."
            }
            BloodPressureCategory::Stage1 => {
                "Blood pressure is in the stage 1 hypertension range. Monitor closely and consider preventive measures."
            }
            BloodPressureCategory::Elevated => {
                "Blood pressure readings are elevated. Consider lifestyle modifications and a medical consultation."
            }
        }
    }
}

/// Blood glucose category from the mean reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum GlucoseCategory {
    /// Mean at most 100 mg/dL
    #[serde(rename = "normal")]
    Normal,

    /// Mean above 100 and at most 126 mg/dL
    #[serde(rename = "pre-diabetic range")]
    PreDiabetic,

    /// Mean above 126 mg/dL
    #[serde(rename = "elevated/possible diabetes")]
    Elevated,
}

impl GlucoseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            GlucoseCategory::Normal => "normal",
            GlucoseCategory::PreDiabetic => "pre-diabetic range",
            GlucoseCategory::Elevated => "elevated/possible diabetes",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            GlucoseCategory::Normal => "Blood glucose is within the normal range.",
            GlucoseCategory::PreDiabetic => {
                "Blood glucose is in the pre-diabetic range. Consider dietary changes and regular monitoring."
            }
            GlucoseCategory::Elevated => {
                "Blood glucose is elevated and may indicate diabetes. Consult a healthcare provider."
            }
        }
    }
}

macro_rules! display_label {
    ($($category:ty),*) => {
        $(impl fmt::Display for $category {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(HeartRateCategory, BloodPressureCategory, GlucoseCategory);

/// Classifier output for the three scored vitals, with the means it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthInsights {
    pub heart_rate: HeartRateCategory,
    pub blood_pressure: BloodPressureCategory,
    pub glucose: GlucoseCategory,

    pub avg_heart_rate: f64,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_glucose: f64,
}

impl HealthInsights {
    /// One advisory sentence per vital
    pub fn observations(&self) -> Vec<&'static str> {
        vec![
            self.heart_rate.advice(),
            self.blood_pressure.advice(),
            self.glucose.advice(),
        ]
    }
}

/// Overall health score in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(transparent)]
pub struct HealthScore(u8);

impl HealthScore {
    pub const MAX: HealthScore = HealthScore(100);

    /// Score from a raw value, saturating into `0..=100`
    pub fn saturating(value: i32) -> Self {
        HealthScore(value.clamp(0, 100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn rating(&self) -> HealthRating {
        match self.0 {
            90..=100 => HealthRating::Excellent,
            75..=89 => HealthRating::Good,
            60..=74 => HealthRating::Fair,
            _ => HealthRating::NeedsAttention,
        }
    }
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100", self.0)
    }
}

/// Status banner for a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl HealthRating {
    pub fn message(&self) -> &'static str {
        match self {
            HealthRating::Excellent => "Excellent health status. Keep up the great work.",
            HealthRating::Good => "Good health status with room for minor improvements.",
            HealthRating::Fair => "Fair health status. Consider lifestyle modifications.",
            HealthRating::NeedsAttention => {
                "Health status needs attention. Consult with a healthcare provider."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_serialize_as_display_strings() {
        assert_eq!(serde_json::to_string(&HeartRateCategory::AboveNormal).unwrap(), "\"above normal\"");
        assert_eq!(serde_json::to_string(&BloodPressureCategory::Stage1).unwrap(), "\"stage 1\"");
        assert_eq!(
            serde_json::to_string(&GlucoseCategory::Elevated).unwrap(),
            "\"elevated/possible diabetes\""
        );
        assert_eq!(GlucoseCategory::PreDiabetic.to_string(), "pre-diabetic range");
    }

    #[test]
    fn test_score_saturates() {
        assert_eq!(HealthScore::saturating(-40).value(), 0);
        assert_eq!(HealthScore::saturating(140).value(), 100);
        assert_eq!(HealthScore::saturating(85).to_string(), "85/100");
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(HealthScore::saturating(100).rating(), HealthRating::Excellent);
        assert_eq!(HealthScore::saturating(90).rating(), HealthRating::Excellent);
        assert_eq!(HealthScore::saturating(85).rating(), HealthRating::Good);
        assert_eq!(HealthScore::saturating(75).rating(), HealthRating::Good);
        assert_eq!(HealthScore::saturating(65).rating(), HealthRating::Fair);
        assert_eq!(HealthScore::saturating(40).rating(), HealthRating::NeedsAttention);
    }
}
