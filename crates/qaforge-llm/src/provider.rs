//! Core abstraction for text-completion backends.

use crate::error::LlmError;

pub trait CompletionProvider: Send + Sync {
    /// Send a plain-text prompt and return the model's text completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate, the response
    /// cannot be parsed, or the completion text is empty.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;

    fn name(&self) -> &'static str;
}
