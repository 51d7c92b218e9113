//! Windowed summary statistics over a health series.
//!
//! Everything here is a pure function of the series it is given. Nothing is cached:
//! snapshots are recomputed on every call.

use thiserror::Error;
use tracing::debug;

use health_pulse_data::models::{HealthRecord, HealthSeries, Metric};

use crate::entities::analytics::{
    AggregateSnapshot, CorrelationMatrix, MetricSummary, Trend, TrendComparison, Window,
};

/// Rows compared on each side of a full-length trend
const TREND_SPAN: usize = 7;

/// Analytics errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// The series or window holds no usable values
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// Rows of `series` covered by `window`.
///
/// Windows asking for more rows than exist are truncated to the rows available.
pub fn window_rows(series: &HealthSeries, window: Window) -> &[HealthRecord] {
    let records = series.records();
    match window {
        Window::All => records,
        Window::Last { rows } => series.tail(rows),
        Window::Previous { skip, len } => {
            let end = records.len().saturating_sub(skip);
            let start = end.saturating_sub(len);
            &records[start..end]
        }
    }
}

/// Mean, min and max of `metric` over `window`
pub fn summarize(
    series: &HealthSeries,
    metric: Metric,
    window: Window,
) -> Result<MetricSummary, AnalyticsError> {
    let rows = window_rows(series, window);
    if rows.is_empty() {
        return Err(AnalyticsError::InsufficientData(format!(
            "No records in window {}",
            window
        )));
    }

    summarize_rows(metric, rows).ok_or_else(|| {
        AnalyticsError::InsufficientData(format!("No {} values in window {}", metric, window))
    })
}

pub fn mean(series: &HealthSeries, metric: Metric, window: Window) -> Result<f64, AnalyticsError> {
    summarize(series, metric, window).map(|summary| summary.mean)
}

pub fn min(series: &HealthSeries, metric: Metric, window: Window) -> Result<f64, AnalyticsError> {
    summarize(series, metric, window).map(|summary| summary.min)
}

pub fn max(series: &HealthSeries, metric: Metric, window: Window) -> Result<f64, AnalyticsError> {
    summarize(series, metric, window).map(|summary| summary.max)
}

/// Summaries of every required metric, plus optional metrics that have values in the window
pub fn snapshot(series: &HealthSeries, window: Window) -> Result<AggregateSnapshot, AnalyticsError> {
    let rows = window_rows(series, window);
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => {
            return Err(AnalyticsError::InsufficientData(format!(
                "No records in window {}",
                window
            )))
        }
    };

    let metrics: Vec<MetricSummary> = Metric::ALL
        .iter()
        .filter_map(|metric| summarize_rows(*metric, rows))
        .collect();

    debug!(
        "Snapshot over {} rows ({}) covering {} metrics",
        rows.len(),
        window,
        metrics.len()
    );

    Ok(AggregateSnapshot {
        window,
        row_count: rows.len(),
        first_date: first,
        last_date: last,
        metrics,
    })
}

/// Compare the recent mean of `metric` with the mean just before it.
///
/// With at least 14 rows the last 7 rows are compared with the 7 before them.
/// Shorter series compare their last half with their first half, leaving the middle
/// row of an odd-length series out. Fewer than 2 rows, or a half without values,
/// gives [`Trend::Unknown`].
pub fn trend(series: &HealthSeries, metric: Metric) -> TrendComparison {
    let records = series.records();
    let len = records.len();

    if len < 2 {
        return TrendComparison {
            metric,
            direction: Trend::Unknown,
            recent_mean: None,
            previous_mean: None,
            recent_rows: len,
            previous_rows: 0,
        };
    }

    let (recent, previous) = if len >= 2 * TREND_SPAN {
        (
            &records[len - TREND_SPAN..],
            &records[len - 2 * TREND_SPAN..len - TREND_SPAN],
        )
    } else {
        let half = len / 2;
        (&records[len - half..], &records[..half])
    };

    let recent_mean = mean_of(&HealthSeries::values(metric, recent));
    let previous_mean = mean_of(&HealthSeries::values(metric, previous));

    let direction = match (recent_mean, previous_mean) {
        (Some(recent), Some(previous)) if recent > previous => Trend::Up,
        (Some(recent), Some(previous)) if recent < previous => Trend::Down,
        (Some(_), Some(_)) => Trend::Stable,
        _ => Trend::Unknown,
    };

    TrendComparison {
        metric,
        direction,
        recent_mean,
        previous_mean,
        recent_rows: recent.len(),
        previous_rows: previous.len(),
    }
}

/// Trend of every metric the series carries
pub fn trends(series: &HealthSeries) -> Vec<TrendComparison> {
    available_metrics(series)
        .into_iter()
        .map(|metric| trend(series, metric))
        .collect()
}

/// Required metrics plus the optional ones with at least one value
pub fn available_metrics(series: &HealthSeries) -> Vec<Metric> {
    Metric::ALL
        .iter()
        .copied()
        .filter(|metric| metric.is_required() || series.has_metric(*metric))
        .collect()
}

/// Pearson correlation between every pair of `metrics`, over rows where both are present
pub fn correlation_matrix(series: &HealthSeries, metrics: &[Metric]) -> CorrelationMatrix {
    let coefficients = metrics
        .iter()
        .map(|a| {
            metrics
                .iter()
                .map(|b| pearson(series.records(), *a, *b))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        metrics: metrics.to_vec(),
        coefficients,
    }
}

fn summarize_rows(metric: Metric, rows: &[HealthRecord]) -> Option<MetricSummary> {
    let values = HealthSeries::values(metric, rows);
    let mean = mean_of(&values)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(MetricSummary {
        metric,
        mean,
        min,
        max,
        count: values.len(),
    })
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn pearson(rows: &[HealthRecord], a: Metric, b: Metric) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|record| Some((a.value(record)?, b.value(record)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}
