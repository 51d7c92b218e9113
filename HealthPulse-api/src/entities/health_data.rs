use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use health_pulse_data::ingest::ParseError;
use health_pulse_domain::services::ExtractionMethod;

/// Outcome of a CSV upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    /// Rows that became records
    pub accepted_rows: usize,

    /// Rows that were skipped, with the reason
    pub rejected: Vec<ParseError>,

    /// Whether the session's series was replaced
    pub replaced: bool,

    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Text of a medical document to extract records from
#[derive(Debug, Deserialize, ToSchema)]
pub struct DocumentRequest {
    pub text: String,
}

/// Outcome of a document extraction
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub method: ExtractionMethod,
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Query parameters for a single metric summary
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SummaryQueryParams {
    /// Metric column name, e.g. `heart_rate`
    pub metric: String,

    /// `all` (default), `last_<rows>` or `previous_<skip>_<len>`
    pub window: Option<String>,
}
