//! watsonx.ai text generation.
//!
//! Each call first trades the API key for an IAM bearer token, then posts the prompt to the
//! text generation endpoint. A fresh token is requested per call and nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use super::{CallStage, ProviderError, ResponseProvider};

pub const DEFAULT_URL: &str = "https://us-south.ml.cloud.ibm.com";
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";
pub const DEFAULT_MODEL_ID: &str = "ibm/granite-13b-instruct-v2";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 200;

/// Upper bound for the token exchange
pub const MAX_TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for the generation request
pub const MAX_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

const API_VERSION: &str = "2023-05-29";
const API_KEY_GRANT: &str = "urn:ibm:params:oauth:grant-type:apikey";
const ERROR_BODY_LIMIT: usize = 300;

/// Connection settings for watsonx.ai
#[derive(Debug, Clone)]
pub struct WatsonxConfig {
    pub api_key: String,
    pub project_id: String,
    pub url: String,
    pub iam_url: String,
    pub model_id: String,
    pub max_new_tokens: u32,
    token_timeout: Duration,
    generation_timeout: Duration,
}

impl WatsonxConfig {
    /// Settings with the default endpoint, model and timeouts
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            url: DEFAULT_URL.to_string(),
            iam_url: DEFAULT_IAM_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            token_timeout: MAX_TOKEN_TIMEOUT,
            generation_timeout: MAX_GENERATION_TIMEOUT,
        }
    }

    /// Override the timeouts; values above the stage limits are capped
    pub fn with_timeouts(mut self, token: Duration, generation: Duration) -> Self {
        self.token_timeout = token.min(MAX_TOKEN_TIMEOUT);
        self.generation_timeout = generation.min(MAX_GENERATION_TIMEOUT);
        self
    }

    pub fn token_timeout(&self) -> Duration {
        self.token_timeout
    }

    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout
    }

    fn generation_url(&self) -> String {
        format!(
            "{}/ml/v1/text/generation?version={}",
            self.url.trim_end_matches('/'),
            API_VERSION
        )
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Provider backed by the hosted watsonx.ai model
pub struct WatsonxProvider {
    client: Client,
    config: WatsonxConfig,
}

impl WatsonxProvider {
    pub fn new(config: WatsonxConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured("WATSONX_API_KEY is empty".to_string()));
        }
        if config.project_id.trim().is_empty() {
            return Err(ProviderError::NotConfigured("WATSONX_PROJECT_ID is empty".to_string()));
        }

        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    pub fn config(&self) -> &WatsonxConfig {
        &self.config
    }

    async fn fetch_token(&self) -> Result<String, ProviderError> {
        let timeout = self.config.token_timeout;
        debug!("Requesting IAM token from {}", self.config.iam_url);

        let response = self
            .client
            .post(&self.config.iam_url)
            .timeout(timeout)
            .form(&[("grant_type", API_KEY_GRANT), ("apikey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(CallStage::Token, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("IAM token request failed with status {}", status);
            return Err(ProviderError::Auth(format!(
                "token request returned {}: {}",
                status,
                truncate(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Auth(format!("unreadable token response: {}", e)))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl ResponseProvider for WatsonxProvider {
    #[instrument(skip(self, prompt), fields(model = %self.config.model_id, prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let token = self.fetch_token().await?;
        let timeout = self.config.generation_timeout;

        let response = self
            .client
            .post(self.config.generation_url())
            .timeout(timeout)
            .bearer_auth(token)
            .json(&generation_body(&self.config, prompt))
            .send()
            .await
            .map_err(|e| transport_error(CallStage::Generation, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Generation request failed with status {}", status);
            return Err(ProviderError::Status {
                stage: CallStage::Generation,
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| transport_error(CallStage::Generation, timeout, e))?;

        let text = parse_generation_response(&payload)?;
        debug!("Generated {} characters", text.len());
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "watsonx"
    }
}

/// JSON body of a generation request
pub fn generation_body(config: &WatsonxConfig, prompt: &str) -> Value {
    let pii_filter = json!({
        "input": { "enabled": true, "threshold": 0.5 },
        "output": { "enabled": true, "threshold": 0.5 },
        "mask": { "remove_entity_value": true }
    });

    json!({
        "input": prompt,
        "parameters": {
            "decoding_method": "greedy",
            "max_new_tokens": config.max_new_tokens,
            "min_new_tokens": 0,
            "repetition_penalty": 1
        },
        "model_id": config.model_id,
        "project_id": config.project_id,
        "moderations": {
            "hap": pii_filter,
            "pii": pii_filter,
            "granite_guardian": { "input": { "threshold": 1 } }
        }
    })
}

/// Extract `results[0].generated_text` from a generation response
pub fn parse_generation_response(payload: &Value) -> Result<String, ProviderError> {
    payload
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(|first| first.get("generated_text"))
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| {
            ProviderError::InvalidResponse("response has no results[0].generated_text".to_string())
        })
}

fn transport_error(stage: CallStage, timeout: Duration, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout {
            stage,
            seconds: timeout.as_secs(),
        }
    } else {
        ProviderError::Transport {
            stage,
            message: error.to_string(),
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
