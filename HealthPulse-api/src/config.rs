//! Application configuration.
//!
//! Everything is read from environment variables at startup; the binary loads `.env`
//! first for local development.

use std::str::FromStr;
use std::time::Duration;

use health_pulse_data::synthetic::DEFAULT_SEED;
use health_pulse_domain::providers::watsonx::{
    WatsonxConfig, DEFAULT_IAM_URL, DEFAULT_MAX_NEW_TOKENS, DEFAULT_MODEL_ID, DEFAULT_URL,
    MAX_GENERATION_TIMEOUT, MAX_TOKEN_TIMEOUT,
};

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which response provider answers assistant requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    Watsonx,
    Canned,
}

impl FromStr for ProviderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "watsonx" => Ok(ProviderMode::Watsonx),
            "canned" => Ok(ProviderMode::Canned),
            other => Err(format!("'{}' is not one of watsonx, canned", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub environment: String,
    pub provider: ProviderMode,
    /// Present when the watsonx credentials are set
    pub watsonx: Option<WatsonxConfig>,
    /// Seed for demo and fallback series, and for canned response selection
    pub synthetic_seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "development".to_string(),
            provider: ProviderMode::Canned,
            watsonx: None,
            synthetic_seed: DEFAULT_SEED,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a variable if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = parse_or(&var, "PORT", 3000u16)?;
        let environment = var("APP_ENV").unwrap_or_else(|| "development".to_string());
        let synthetic_seed = parse_or(&var, "SYNTHETIC_SEED", DEFAULT_SEED)?;

        let watsonx = match (var("WATSONX_API_KEY"), var("WATSONX_PROJECT_ID")) {
            (Some(api_key), Some(project_id)) => {
                let token_timeout = parse_or(&var, "WATSONX_TOKEN_TIMEOUT_SECS", MAX_TOKEN_TIMEOUT.as_secs())?;
                let generation_timeout = parse_or(
                    &var,
                    "WATSONX_GENERATION_TIMEOUT_SECS",
                    MAX_GENERATION_TIMEOUT.as_secs(),
                )?;

                let mut config = WatsonxConfig::new(api_key, project_id).with_timeouts(
                    Duration::from_secs(token_timeout),
                    Duration::from_secs(generation_timeout),
                );
                config.url = var("WATSONX_URL").unwrap_or_else(|| DEFAULT_URL.to_string());
                config.iam_url = var("WATSONX_IAM_URL").unwrap_or_else(|| DEFAULT_IAM_URL.to_string());
                config.model_id = var("WATSONX_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
                config.max_new_tokens = parse_or(&var, "WATSONX_MAX_NEW_TOKENS", DEFAULT_MAX_NEW_TOKENS)?;
                Some(config)
            }
            _ => None,
        };

        let provider = match var("RESPONSE_PROVIDER") {
            Some(raw) => raw
                .parse::<ProviderMode>()
                .map_err(|e| ConfigError::InvalidValue("RESPONSE_PROVIDER".to_string(), e))?,
            None if watsonx.is_some() => ProviderMode::Watsonx,
            None => ProviderMode::Canned,
        };

        if provider == ProviderMode::Watsonx && watsonx.is_none() {
            let missing = if var("WATSONX_API_KEY").is_none() {
                "WATSONX_API_KEY"
            } else {
                "WATSONX_PROJECT_ID"
            };
            return Err(ConfigError::MissingVar(missing.to_string()));
        }

        Ok(Self {
            port,
            environment,
            provider,
            watsonx,
            synthetic_seed,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("'{}': {}", raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_credentials() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.provider, ProviderMode::Canned);
        assert!(config.watsonx.is_none());
        assert_eq!(config.synthetic_seed, 42);
    }

    #[test]
    fn test_credentials_select_watsonx() {
        let config = load(&[
            ("WATSONX_API_KEY", "key"),
            ("WATSONX_PROJECT_ID", "project"),
            ("WATSONX_GENERATION_TIMEOUT_SECS", "300"),
        ])
        .unwrap();

        assert_eq!(config.provider, ProviderMode::Watsonx);
        let watsonx = config.watsonx.unwrap();
        assert_eq!(watsonx.url, DEFAULT_URL);
        assert_eq!(watsonx.model_id, DEFAULT_MODEL_ID);
        assert_eq!(watsonx.generation_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_canned_can_be_forced() {
        let config = load(&[
            ("WATSONX_API_KEY", "key"),
            ("WATSONX_PROJECT_ID", "project"),
            ("RESPONSE_PROVIDER", "canned"),
        ])
        .unwrap();
        assert_eq!(config.provider, ProviderMode::Canned);
    }

    #[test]
    fn test_watsonx_without_credentials_fails() {
        let result = load(&[("RESPONSE_PROVIDER", "watsonx"), ("WATSONX_API_KEY", "key")]);
        assert!(matches!(result, Err(ConfigError::MissingVar(ref var)) if var == "WATSONX_PROJECT_ID"));
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(matches!(load(&[("PORT", "eighty")]), Err(ConfigError::InvalidValue(..))));
        assert!(matches!(load(&[("SYNTHETIC_SEED", "-1")]), Err(ConfigError::InvalidValue(..))));
        assert!(matches!(load(&[("RESPONSE_PROVIDER", "openai")]), Err(ConfigError::InvalidValue(..))));
    }
}
