// End-to-end scenarios across ingestion, aggregation, classification, scoring and session state

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use health_pulse_data::ingest::parse_health_csv;
use health_pulse_data::models::{HealthRecord, HealthSeries, Metric};
use health_pulse_data::synthetic::{generate_with_seed, SyntheticProfile};
use health_pulse_domain::entities::{
    BloodPressureCategory, GlucoseCategory, HeartRateCategory, ProfileField, Trend, Window,
};
use health_pulse_domain::services::aggregator::{self, AnalyticsError};
use health_pulse_domain::services::{calculate_health_score, insights, AnalyticsService, AnalyticsServiceTrait};
use health_pulse_domain::session::{SessionError, SessionState};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
}

fn uniform_series(days: i64, heart_rate: f64) -> HealthSeries {
    let records = (0..days)
        .map(|i| HealthRecord::new(start() + Duration::days(i), heart_rate, 120.0, 80.0, 90.0))
        .collect();
    HealthSeries::from_records(records).unwrap()
}

#[test]
fn test_fourteen_identical_normal_rows_score_full() {
    let series = uniform_series(14, 75.0);
    let snapshot = aggregator::snapshot(&series, Window::All).unwrap();
    let insights = insights::classify(&snapshot).unwrap();

    assert_eq!(insights.heart_rate, HeartRateCategory::Normal);
    assert_eq!(insights.blood_pressure, BloodPressureCategory::Normal);
    assert_eq!(insights.glucose, GlucoseCategory::Normal);
    assert_eq!(calculate_health_score(&insights).value(), 100);
    assert_eq!(aggregator::trend(&series, Metric::HeartRate).direction, Trend::Stable);
}

#[test]
fn test_seven_tachycardic_rows_lose_heart_rate_points() {
    let report = AnalyticsService::new().report(&uniform_series(7, 110.0)).unwrap();

    assert_eq!(report.insights.heart_rate, HeartRateCategory::AboveNormal);
    assert_eq!(report.insights.blood_pressure, BloodPressureCategory::Normal);
    assert_eq!(report.score.value(), 85);
}

#[test]
fn test_empty_series_rejects_aggregates_and_score() {
    let series = HealthSeries::empty();
    for metric in Metric::REQUIRED {
        assert!(matches!(
            aggregator::mean(&series, metric, Window::All),
            Err(AnalyticsError::InsufficientData(_))
        ));
        assert!(aggregator::min(&series, metric, Window::All).is_err());
        assert!(aggregator::max(&series, metric, Window::All).is_err());
    }
    assert!(AnalyticsService::new().report(&series).is_err());
    assert_eq!(aggregator::trend(&series, Metric::HeartRate).direction, Trend::Unknown);
}

#[test]
fn test_ingested_table_mean_matches_input() {
    let csv = "date,heart_rate,systolic_bp,diastolic_bp,blood_glucose,temperature,weight,sleep_hours\n\
               2024-01-01,71.3,118.2,76.4,92.1,98.4,70.2,7.1\n\
               2024-01-02,68.9,121.7,79.9,88.6,98.7,70.0,6.8\n\
               2024-01-03,74.2,119.5,78.1,101.3,,69.8,7.9\n";
    let report = parse_health_csv(csv.as_bytes()).unwrap();
    assert!(report.rejected.is_empty());

    let expected = (71.3 + 68.9 + 74.2) / 3.0;
    let mean = aggregator::mean(&report.series, Metric::HeartRate, Window::All).unwrap();
    assert!((mean - expected).abs() < 1e-9);

    let temperature = aggregator::summarize(&report.series, Metric::Temperature, Window::All).unwrap();
    assert_eq!(temperature.count, 2);
    assert!((temperature.mean - (98.4 + 98.7) / 2.0).abs() < 1e-9);
}

#[test]
fn test_score_stays_in_range_for_generated_series() {
    let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let service = AnalyticsService::new();

    for seed in 0..25 {
        for profile in [SyntheticProfile::DocumentSample, SyntheticProfile::DemoTrend] {
            let report = service.report(&generate_with_seed(profile, end, seed)).unwrap();
            assert!(report.score.value() <= 100);
        }
    }

    // Every penalty at once still saturates inside the range
    let records = (0..3)
        .map(|i| HealthRecord::new(start() + Duration::days(i), 140.0, 180.0, 110.0, 250.0))
        .collect();
    let report = service.report(&HealthSeries::from_records(records).unwrap()).unwrap();
    assert_eq!(report.score.value(), 40);
}

#[test]
fn test_classifier_boundaries_are_inclusive_as_documented() {
    assert_eq!(insights::classify_blood_pressure(130.0, 80.0), BloodPressureCategory::Normal);
    assert_eq!(insights::classify_blood_pressure(130.01, 80.0), BloodPressureCategory::Stage1);
    assert_eq!(insights::classify_heart_rate(60.0), HeartRateCategory::Normal);
    assert_eq!(insights::classify_heart_rate(100.0), HeartRateCategory::Normal);
    assert_eq!(insights::classify_glucose(100.0), GlucoseCategory::Normal);
    assert_eq!(insights::classify_glucose(126.0), GlucoseCategory::PreDiabetic);
}

#[test]
fn test_out_of_range_age_leaves_session_unchanged() {
    let mut session = SessionState::new();
    session.update_profile(ProfileField::Age, "40").unwrap();
    let before = session.profile().clone();

    let result = session.update_profile(ProfileField::Age, "150");
    assert!(matches!(result, Err(SessionError::Validation(_))));
    assert_eq!(session.profile(), &before);
}

#[test]
fn test_replaced_series_is_never_mixed() {
    let mut session = SessionState::new();
    session.replace_series(uniform_series(10, 70.0));
    let old = session.series().unwrap();

    let report = parse_health_csv(
        "date,heart_rate,systolic_bp,diastolic_bp,blood_glucose\n2024-03-01,90,120,80,90\n".as_bytes(),
    )
    .unwrap();
    session.replace_series(report.series);
    let new = session.series().unwrap();

    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(old.len(), 10);
    assert!(old.records().iter().all(|r| r.heart_rate == 70.0));
    assert_eq!(new.len(), 1);
    assert_eq!(new.records()[0].heart_rate, 90.0);
}

#[test]
fn test_report_summary_matches_aggregator() {
    let series = generate_with_seed(
        SyntheticProfile::DemoTrend,
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        42,
    );
    let service = AnalyticsService::new();
    let summary = service.summary(&series, Metric::BloodGlucose, Window::PREVIOUS_WEEK).unwrap();
    let trend = aggregator::trend(&series, Metric::BloodGlucose);

    assert_eq!(summary.count, 7);
    assert_eq!(trend.previous_mean, Some(summary.mean));
}
