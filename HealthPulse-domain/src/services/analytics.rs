use chrono::Utc;
use tracing::{debug, instrument};

use health_pulse_data::models::{HealthSeries, Metric};

use crate::entities::analytics::{HealthReport, MetricSummary, Window};
use crate::services::aggregator::{self, AnalyticsError};
use crate::services::health_score::calculate_health_score;
use crate::services::insights::classify;

/// Trait for analytics operations over a health series
pub trait AnalyticsServiceTrait {
    /// Full dashboard report for a series
    fn report(&self, series: &HealthSeries) -> Result<HealthReport, AnalyticsError>;

    /// Summary of one metric over one window
    fn summary(
        &self,
        series: &HealthSeries,
        metric: Metric,
        window: Window,
    ) -> Result<MetricSummary, AnalyticsError>;
}

/// Analytics service for domain logic
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }
}

impl AnalyticsServiceTrait for AnalyticsService {
    #[instrument(skip(self, series), fields(rows = series.len()))]
    fn report(&self, series: &HealthSeries) -> Result<HealthReport, AnalyticsError> {
        if series.is_empty() {
            return Err(AnalyticsError::InsufficientData(
                "No health records available to generate a report".to_string(),
            ));
        }

        let overall = aggregator::snapshot(series, Window::All)?;
        let recent = aggregator::snapshot(series, Window::RECENT_WEEK)?;
        let insights = classify(&overall)?;
        let score = calculate_health_score(&insights);
        let metrics = aggregator::available_metrics(series);

        let rating = score.rating();
        debug!("Health score {} ({:?})", score, rating);

        Ok(HealthReport {
            trends: aggregator::trends(series),
            correlations: aggregator::correlation_matrix(series, &metrics),
            status_message: rating.message().to_string(),
            observations: insights.observations().into_iter().map(String::from).collect(),
            rating,
            overall,
            recent,
            insights,
            score,
            generated_at: Utc::now(),
        })
    }

    fn summary(
        &self,
        series: &HealthSeries,
        metric: Metric,
        window: Window,
    ) -> Result<MetricSummary, AnalyticsError> {
        aggregator::summarize(series, metric, window)
    }
}

/// Create the default analytics service
pub fn create_default_analytics_service() -> impl AnalyticsServiceTrait + Send + Sync {
    AnalyticsService::new()
}
