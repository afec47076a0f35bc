//! Test-only mock completion provider.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::CompletionProvider;

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    pub default_response: String,
    pub fail_generate: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            fail_generate: false,
        }
    }
}

impl MockProvider {
    /// Scripted responses are consumed in order; once exhausted,
    /// `default_response` is returned. An empty scripted response surfaces
    /// as `LlmError::EmptyResponse`, matching the real adapters.
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_generate: true,
            ..Self::default()
        }
    }
}

impl CompletionProvider for MockProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        if self.fail_generate {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        let response = if responses.is_empty() {
            self.default_response.clone()
        } else {
            responses.remove(0)
        };
        if response.is_empty() {
            return Err(LlmError::EmptyResponse { provider: "mock" });
        }
        Ok(response)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
