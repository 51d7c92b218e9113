// HealthPulse Domain
// This crate contains the business logic for the HealthPulse assistant

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Per-session state
pub mod session;

// Prompt construction
pub mod prompts;

// Text-generation providers
pub mod providers;

// Health checks and system status
pub mod health;

// Re-export the data layer for convenience
pub use health_pulse_data as data;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
