// Storage models for health data
pub mod health_record;
pub mod health_series;

// Re-export common types for easier imports
pub use health_record::{HealthRecord, Metric};
pub use health_series::{HealthSeries, SeriesError};
