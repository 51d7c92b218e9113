// HealthPulse-api lib.rs
//
// HTTP surface of the HealthPulse assistant: sessions, health data uploads,
// analytics and assistant calls.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
pub mod state;

use axum::Router;

use health_pulse_domain::providers::ProviderError;

use crate::config::AppConfig;
use crate::state::AppState;

/// Build the router for a configuration
pub fn create_application(config: AppConfig) -> Result<Router, ProviderError> {
    let state = AppState::from_config(config)?;
    Ok(api::create_application(state))
}
