use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::health_record::{HealthRecord, Metric};

/// Errors raised while assembling a series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// Two records share the same calendar day
    #[error("Duplicate record for date {0}")]
    DuplicateDate(NaiveDate),
}

/// Date-ordered daily health records owned by a single session.
///
/// Records are sorted ascending by date and dates are unique, so the last `k`
/// rows are always the most recent `k` days. A series is never edited in place;
/// new data produces a new series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthSeries {
    records: Vec<HealthRecord>,
}

impl HealthSeries {
    /// Build a series from records in any order
    pub fn from_records(mut records: Vec<HealthRecord>) -> Result<Self, SeriesError> {
        records.sort_by_key(|record| record.date);

        if let Some(pair) = records.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(SeriesError::DuplicateDate(pair[1].date));
        }

        Ok(Self { records })
    }

    /// Wrap records already in strictly ascending date order
    pub(crate) fn from_ordered(records: Vec<HealthRecord>) -> Self {
        debug_assert!(records.windows(2).all(|pair| pair[0].date < pair[1].date));
        Self { records }
    }

    /// Series with no records
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|record| record.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|record| record.date)
    }

    /// The most recent `k` rows, or every row when fewer exist
    pub fn tail(&self, k: usize) -> &[HealthRecord] {
        let start = self.records.len().saturating_sub(k);
        &self.records[start..]
    }

    /// Whether any record carries a value for `metric`
    pub fn has_metric(&self, metric: Metric) -> bool {
        self.records.iter().any(|record| metric.value(record).is_some())
    }

    /// Present values of `metric` across `rows`, skipping absent optional values
    pub fn values(metric: Metric, rows: &[HealthRecord]) -> Vec<f64> {
        rows.iter().filter_map(|record| metric.value(record)).collect()
    }
}
