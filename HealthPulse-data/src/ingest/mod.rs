//! Tabular health-data ingestion.
//!
//! Uploads are CSV tables with the columns
//! `date, heart_rate, systolic_bp, diastolic_bp, blood_glucose, temperature, weight, sleep_hours`.
//! A header without one of the required columns rejects the whole upload. Individual
//! rows that fail to parse are skipped and reported, and the remaining rows are kept.

pub mod errors;

use std::collections::{HashMap, HashSet};
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{HealthRecord, HealthSeries, Metric};
pub use errors::{IngestError, ParseError};

/// Name of the date column
pub const DATE_COLUMN: &str = "date";

/// Outcome of ingesting one upload
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Series built from every row that parsed
    pub series: HealthSeries,

    /// Rows that were skipped, in input order
    pub rejected: Vec<ParseError>,
}

impl IngestReport {
    pub fn accepted_rows(&self) -> usize {
        self.series.len()
    }
}

/// Parse a CSV upload into a health series.
///
/// Row numbers in reported errors are 1-based and count data rows only (the header is not row 1).
/// Empty lines are skipped by the reader and never counted, so a row number is not a line number
/// once the input contains blank lines.
pub fn parse_health_csv<R: Read>(input: R) -> Result<IngestReport, IngestError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut seen_dates = HashSet::new();
    let mut rejected = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row_number = index + 1;

        let parsed = row
            .map_err(|e| ParseError::row(row_number, e.to_string()))
            .and_then(|raw| columns.parse_row(row_number, &raw));

        match parsed {
            Ok(record) if !seen_dates.insert(record.date) => {
                let error = ParseError::column(
                    row_number,
                    DATE_COLUMN,
                    format!("duplicate date {}", record.date),
                );
                warn!("Rejected health data row: {}", error);
                rejected.push(error);
            }
            Ok(record) => records.push(record),
            Err(error) => {
                warn!("Rejected health data row: {}", error);
                rejected.push(error);
            }
        }
    }

    let series = HealthSeries::from_records(records)?;
    debug!(
        "Ingested {} health records ({} rejected)",
        series.len(),
        rejected.len()
    );

    Ok(IngestReport { series, rejected })
}

/// Parse a calendar date, discarding any time-of-day component
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.date());
        }
    }

    if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }

    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

/// Header positions of the known columns
struct ColumnMap {
    date: usize,
    metrics: HashMap<Metric, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, IngestError> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim().to_ascii_lowercase(), index))
            .collect();

        let date = *positions
            .get(DATE_COLUMN)
            .ok_or_else(|| IngestError::MissingColumn(DATE_COLUMN.to_string()))?;

        let mut metrics = HashMap::new();
        for metric in Metric::ALL {
            match positions.get(metric.column()) {
                Some(index) => {
                    metrics.insert(metric, *index);
                }
                None if metric.is_required() => {
                    return Err(IngestError::MissingColumn(metric.column().to_string()));
                }
                None => {}
            }
        }

        Ok(Self { date, metrics })
    }

    fn cell<'r>(&self, raw: &'r StringRecord, index: usize) -> &'r str {
        raw.get(index).unwrap_or("").trim()
    }

    fn parse_row(&self, row: usize, raw: &StringRecord) -> Result<HealthRecord, ParseError> {
        let date_cell = self.cell(raw, self.date);
        let date = parse_date(date_cell).ok_or_else(|| {
            ParseError::column(row, DATE_COLUMN, format!("'{}' is not a calendar date", date_cell))
        })?;

        let required = |metric: Metric| -> Result<f64, ParseError> {
            self.optional_value(row, raw, metric)?.ok_or_else(|| {
                ParseError::column(row, metric.column(), "value is missing".to_string())
            })
        };

        Ok(HealthRecord {
            date,
            heart_rate: required(Metric::HeartRate)?,
            systolic_bp: required(Metric::SystolicBp)?,
            diastolic_bp: required(Metric::DiastolicBp)?,
            blood_glucose: required(Metric::BloodGlucose)?,
            temperature: self.optional_value(row, raw, Metric::Temperature)?,
            weight: self.optional_value(row, raw, Metric::Weight)?,
            sleep_hours: self.optional_value(row, raw, Metric::SleepHours)?,
        })
    }

    fn optional_value(
        &self,
        row: usize,
        raw: &StringRecord,
        metric: Metric,
    ) -> Result<Option<f64>, ParseError> {
        let Some(&index) = self.metrics.get(&metric) else {
            return Ok(None);
        };

        let cell = self.cell(raw, index);
        if cell.is_empty() {
            return Ok(None);
        }

        match cell.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            Ok(_) => Err(ParseError::column(
                row,
                metric.column(),
                format!("'{}' is not a finite number", cell),
            )),
            Err(_) => Err(ParseError::column(
                row,
                metric.column(),
                format!("'{}' is not a number", cell),
            )),
        }
    }
}
