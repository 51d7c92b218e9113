use crate::entities::insights::{
    BloodPressureCategory, GlucoseCategory, HealthInsights, HealthScore, HeartRateCategory,
};

const HEART_RATE_PENALTY: i32 = 15;
const BLOOD_PRESSURE_PENALTY: i32 = 20;
const GLUCOSE_PENALTY: i32 = 25;

/// Score the classified vitals: 100 minus a fixed penalty for every vital outside its normal band.
///
/// Heart rate outside 60-100 bpm costs 15, systolic above 130 or diastolic above 80 costs 20,
/// glucose above 100 mg/dL costs 25. The result never drops below 0.
pub fn calculate_health_score(insights: &HealthInsights) -> HealthScore {
    let mut score = 100;

    if insights.heart_rate != HeartRateCategory::Normal {
        score -= HEART_RATE_PENALTY;
    }

    if insights.blood_pressure != BloodPressureCategory::Normal {
        score -= BLOOD_PRESSURE_PENALTY;
    }

    if insights.glucose != GlucoseCategory::Normal {
        score -= GLUCOSE_PENALTY;
    }

    HealthScore::saturating(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::insights::HealthRating;
    use crate::services::insights::{classify_blood_pressure, classify_glucose, classify_heart_rate};

    fn insights(heart_rate: f64, systolic: f64, diastolic: f64, glucose: f64) -> HealthInsights {
        HealthInsights {
            heart_rate: classify_heart_rate(heart_rate),
            blood_pressure: classify_blood_pressure(systolic, diastolic),
            glucose: classify_glucose(glucose),
            avg_heart_rate: heart_rate,
            avg_systolic: systolic,
            avg_diastolic: diastolic,
            avg_glucose: glucose,
        }
    }

    #[test]
    fn test_all_normal_scores_full() {
        let score = calculate_health_score(&insights(75.0, 120.0, 80.0, 90.0));
        assert_eq!(score.value(), 100);
        assert_eq!(score.rating(), HealthRating::Excellent);
    }

    #[test]
    fn test_individual_penalties() {
        assert_eq!(calculate_health_score(&insights(110.0, 120.0, 80.0, 90.0)).value(), 85);
        assert_eq!(calculate_health_score(&insights(50.0, 120.0, 80.0, 90.0)).value(), 85);
        assert_eq!(calculate_health_score(&insights(75.0, 135.0, 80.0, 90.0)).value(), 80);
        assert_eq!(calculate_health_score(&insights(75.0, 150.0, 95.0, 90.0)).value(), 80);
        assert_eq!(calculate_health_score(&insights(75.0, 120.0, 80.0, 110.0)).value(), 75);
    }

    #[test]
    fn test_all_penalties_stay_in_range() {
        let score = calculate_health_score(&insights(130.0, 160.0, 100.0, 200.0));
        assert_eq!(score.value(), 40);
        assert_eq!(score.rating(), HealthRating::NeedsAttention);
    }
}
