use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use health_pulse_data::models::Metric;

use super::insights::{HealthInsights, HealthRating, HealthScore};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Contiguous range of rows in a date-ordered series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Window {
    /// Every row
    All,

    /// The most recent `rows` rows
    Last { rows: usize },

    /// `len` rows ending `skip` rows before the most recent one
    Previous { skip: usize, len: usize },
}

impl Window {
    /// Last seven days
    pub const RECENT_WEEK: Window = Window::Last { rows: 7 };

    /// The seven days before the last seven
    pub const PREVIOUS_WEEK: Window = Window::Previous { skip: 7, len: 7 };
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::All => write!(f, "all"),
            Window::Last { rows } => write!(f, "last_{}", rows),
            Window::Previous { skip, len } => write!(f, "previous_{}_{}", skip, len),
        }
    }
}

impl FromStr for Window {
    type Err = String;

    /// Parses `all`, `last_<rows>` and `previous_<skip>_<len>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let invalid = || format!("Invalid window '{}': expected all, last_<rows> or previous_<skip>_<len>", s);

        if s == "all" {
            return Ok(Window::All);
        }

        if let Some(rows) = s.strip_prefix("last_") {
            let rows = rows.parse().map_err(|_| invalid())?;
            return Ok(Window::Last { rows });
        }

        if let Some(rest) = s.strip_prefix("previous_") {
            let (skip, len) = rest.split_once('_').ok_or_else(invalid)?;
            return Ok(Window::Previous {
                skip: skip.parse().map_err(|_| invalid())?,
                len: len.parse().map_err(|_| invalid())?,
            });
        }

        Err(invalid())
    }
}

/// Mean and extrema of one metric over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MetricSummary {
    pub metric: Metric,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Number of values the summary was computed from
    pub count: usize,
}

/// Summary statistics for every available metric over one window.
/// Derived on demand from a series and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AggregateSnapshot {
    pub window: Window,
    pub row_count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub metrics: Vec<MetricSummary>,
}

impl AggregateSnapshot {
    pub fn get(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.iter().find(|summary| summary.metric == metric)
    }

    pub fn mean(&self, metric: Metric) -> Option<f64> {
        self.get(metric).map(|summary| summary.mean)
    }
}

/// Direction of a metric between two adjacent windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
    /// Not enough rows to compare
    Unknown,
}

/// Recent-versus-previous comparison of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TrendComparison {
    pub metric: Metric,
    pub direction: Trend,
    pub recent_mean: Option<f64>,
    pub previous_mean: Option<f64>,
    pub recent_rows: usize,
    pub previous_rows: usize,
}

/// Pearson correlation between pairs of metrics.
/// `coefficients[i][j]` pairs `metrics[i]` with `metrics[j]`; `None` when undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CorrelationMatrix {
    pub metrics: Vec<Metric>,
    pub coefficients: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient for a metric pair; `None` when either metric or the cell is absent
    pub fn get(&self, a: Metric, b: Metric) -> Option<f64> {
        let i = self.metrics.iter().position(|m| *m == a)?;
        let j = self.metrics.iter().position(|m| *m == b)?;
        self.coefficients.get(i)?.get(j).copied().flatten()
    }
}

/// Everything the analytics view shows for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthReport {
    /// Statistics over the whole series
    pub overall: AggregateSnapshot,

    /// Statistics over the last seven rows
    pub recent: AggregateSnapshot,

    /// Recent-versus-previous comparison per metric
    pub trends: Vec<TrendComparison>,

    /// Categorical judgments from the whole-series means
    pub insights: HealthInsights,

    /// Health score derived from the insights
    pub score: HealthScore,

    /// Banner rating for the score
    pub rating: HealthRating,

    /// Banner text shown with the rating
    pub status_message: String,

    /// One readable line per classified metric
    pub observations: Vec<String>,

    /// Correlations between the available metrics
    pub correlations: CorrelationMatrix,

    /// When the report was computed
    pub generated_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn trend(&self, metric: Metric) -> Option<&TrendComparison> {
        self.trends.iter().find(|trend| trend.metric == metric)
    }
}
