// Public entities for the HealthPulse API
// Request and response bodies exchanged at the HTTP boundary

// Error responses
pub mod common;

// Session, profile and conversation bodies
pub mod session;

// Health data uploads and summaries
pub mod health_data;

// Assistant requests
pub mod assistant;

pub use common::ErrorResponse;
