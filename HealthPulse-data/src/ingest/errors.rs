use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SeriesError;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// A single uploaded row that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ParseError {
    /// 1-based data row number
    pub row: usize,

    /// Offending column, when the failure is tied to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Description of the failure
    pub message: String,
}

impl ParseError {
    pub fn row(row: usize, message: String) -> Self {
        Self {
            row,
            column: None,
            message,
        }
    }

    pub fn column(row: usize, column: &str, message: String) -> Self {
        Self {
            row,
            column: Some(column.to_string()),
            message,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "row {}, column {}: {}", self.row, column, self.message),
            None => write!(f, "row {}: {}", self.row, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Failures that reject an upload as a whole
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required column is absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The input could not be read as CSV
    #[error("Unreadable CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// The accepted rows did not form a valid series
    #[error("Invalid series: {0}")]
    Series(#[from] SeriesError),
}
