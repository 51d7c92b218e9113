// Domain entities and value objects
pub mod analytics;
pub mod conversation;
pub mod insights;
pub mod profile;

// Re-export common types for easier imports
pub use analytics::{AggregateSnapshot, CorrelationMatrix, HealthReport, MetricSummary, Trend, TrendComparison, Window};
pub use conversation::{ConversationTurn, Role, TurnStatus};
pub use insights::{BloodPressureCategory, GlucoseCategory, HealthInsights, HealthRating, HealthScore, HeartRateCategory};
pub use profile::{Gender, PatientProfile, ProfileField};
