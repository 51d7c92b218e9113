// Text-generation providers
// The assistant only depends on the ResponseProvider capability; which variant
// answers is chosen at startup.

pub mod canned;
pub mod watsonx;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use canned::CannedResponseProvider;
pub use watsonx::{WatsonxConfig, WatsonxProvider};

/// Stage of the two-step model call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStage {
    /// Exchanging the API key for a bearer token
    Token,
    /// The text generation request itself
    Generation,
}

impl fmt::Display for CallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStage::Token => write!(f, "token request"),
            CallStage::Generation => write!(f, "generation request"),
        }
    }
}

/// Failure of an external model call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Required credentials or settings are missing
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The API key was rejected or no token came back
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A stage exceeded its timeout
    #[error("{stage} timed out after {seconds}s")]
    Timeout { stage: CallStage, seconds: u64 },

    /// A stage answered with a non-success status
    #[error("{stage} failed with status {status}: {body}")]
    Status {
        stage: CallStage,
        status: u16,
        body: String,
    },

    /// The request could not be sent or the body could not be read
    #[error("{stage} transport error: {message}")]
    Transport { stage: CallStage, message: String },

    /// The service answered but not in the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Capability to turn a prompt into generated text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Generate a reply for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Short name for logs and health output
    fn name(&self) -> &'static str;
}
