// Testing utilities for the domain layer
// Available to this crate's tests and, through the "mock" feature, to the API tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::providers::{ProviderError, ResponseProvider};

/// Provider returning one fixed reply (or one fixed error) and recording every prompt
pub struct StubResponseProvider {
    reply: Result<String, ProviderError>,
    prompts: Mutex<Vec<String>>,
}

impl StubResponseProvider {
    /// Stub answering every prompt with `reply`
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Stub failing every call with `error`
    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

impl Default for StubResponseProvider {
    fn default() -> Self {
        Self::replying("This is a stub response.")
    }
}

#[async_trait]
impl ResponseProvider for StubResponseProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
