#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rate limited")]
    RateLimited,

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("{provider} API request failed (status {status})")]
    Api { provider: &'static str, status: u16 },

    #[error("{0}")]
    Other(String),
}

impl LlmError {
    /// True for the soft-failure case: the call succeeded but the model
    /// produced no usable text.
    #[must_use]
    pub const fn is_empty_response(&self) -> bool {
        matches!(self, Self::EmptyResponse { .. })
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
