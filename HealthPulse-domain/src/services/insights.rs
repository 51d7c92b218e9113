use health_pulse_data::models::Metric;

use crate::entities::analytics::AggregateSnapshot;
use crate::entities::insights::{
    BloodPressureCategory, GlucoseCategory, HealthInsights, HeartRateCategory,
};
use crate::services::aggregator::AnalyticsError;

/// Categorize a mean heart rate (bpm)
pub fn classify_heart_rate(mean: f64) -> HeartRateCategory {
    if mean < 60.0 {
        HeartRateCategory::BelowNormal
    } else if mean <= 100.0 {
        HeartRateCategory::Normal
    } else {
        HeartRateCategory::AboveNormal
    }
}

/// Categorize mean blood pressure (mmHg)
pub fn classify_blood_pressure(systolic: f64, diastolic: f64) -> BloodPressureCategory {
    if systolic > 140.0 || diastolic > 90.0 {
        BloodPressureCategory::Elevated
    } else if systolic > 130.0 || diastolic > 80.0 {
        BloodPressureCategory::Stage1
    } else {
        BloodPressureCategory::Normal
    }
}

/// Categorize mean blood glucose (mg/dL)
pub fn classify_glucose(mean: f64) -> GlucoseCategory {
    if mean > 126.0 {
        GlucoseCategory::Elevated
    } else if mean > 100.0 {
        GlucoseCategory::PreDiabetic
    } else {
        GlucoseCategory::Normal
    }
}

/// Classify the vitals of a snapshot
pub fn classify(snapshot: &AggregateSnapshot) -> Result<HealthInsights, AnalyticsError> {
    let require = |metric: Metric| {
        snapshot.mean(metric).ok_or_else(|| {
            AnalyticsError::InsufficientData(format!("No {} values to classify", metric))
        })
    };

    let avg_heart_rate = require(Metric::HeartRate)?;
    let avg_systolic = require(Metric::SystolicBp)?;
    let avg_diastolic = require(Metric::DiastolicBp)?;
    let avg_glucose = require(Metric::BloodGlucose)?;

    Ok(HealthInsights {
        heart_rate: classify_heart_rate(avg_heart_rate),
        blood_pressure: classify_blood_pressure(avg_systolic, avg_diastolic),
        glucose: classify_glucose(avg_glucose),
        avg_heart_rate,
        avg_systolic,
        avg_diastolic,
        avg_glucose,
    })
}
