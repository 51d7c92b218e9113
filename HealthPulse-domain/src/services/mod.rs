pub mod aggregator;
pub mod analytics;
pub mod assistant;
pub mod health_score;
pub mod insights;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use aggregator::AnalyticsError;
pub use analytics::{create_default_analytics_service, AnalyticsService, AnalyticsServiceTrait};
pub use assistant::{AssistantError, AssistantService, ExtractionMethod, ExtractionOutcome};
pub use health_score::calculate_health_score;
