use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use health_pulse_data::repository::InMemoryStorage;
use health_pulse_domain::providers::{
    CannedResponseProvider, ProviderError, ResponseProvider, WatsonxProvider,
};
use health_pulse_domain::services::{AnalyticsService, AnalyticsServiceTrait, AssistantService};
use health_pulse_domain::session::SessionState;

use crate::config::{AppConfig, ProviderMode};
use crate::entities::ErrorResponse;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub sessions: InMemoryStorage<SessionState>,
    pub assistant: AssistantService,
    pub analytics: Arc<dyn AnalyticsServiceTrait + Send + Sync>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State answering through `provider`
    pub fn new(config: AppConfig, provider: Arc<dyn ResponseProvider>) -> Self {
        Self {
            sessions: InMemoryStorage::new(),
            assistant: AssistantService::new(provider),
            analytics: Arc::new(AnalyticsService::new()),
            config: Arc::new(config),
        }
    }

    /// State with the provider selected by the configuration
    pub fn from_config(config: AppConfig) -> Result<Self, ProviderError> {
        let provider: Arc<dyn ResponseProvider> = match (config.provider, &config.watsonx) {
            (ProviderMode::Watsonx, Some(watsonx)) => Arc::new(WatsonxProvider::new(watsonx.clone())?),
            (ProviderMode::Watsonx, None) => {
                return Err(ProviderError::NotConfigured(
                    "watsonx selected without credentials".to_string(),
                ))
            }
            (ProviderMode::Canned, _) => Arc::new(CannedResponseProvider::new(config.synthetic_seed)),
        };

        info!("Using {} response provider", provider.name());
        Ok(Self::new(config, provider))
    }

    /// Copy of a stored session
    pub fn load_session(&self, id: &Uuid) -> Result<SessionState, ErrorResponse> {
        Ok(self.sessions.get(id)?)
    }

    /// Mutate a stored session in place.
    ///
    /// `apply` runs under the store lock and must not await; model calls happen on a copy
    /// and only their results are applied here.
    pub fn update_session<R>(
        &self,
        id: &Uuid,
        apply: impl FnOnce(&mut SessionState) -> R,
    ) -> Result<R, ErrorResponse> {
        Ok(self.sessions.update(id, apply)?)
    }

    /// Last day of generated series
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
