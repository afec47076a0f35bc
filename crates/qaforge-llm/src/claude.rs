use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::provider::CompletionProvider;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Clone for ClaudeProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            base_url: self.base_url.clone(),
        }
    }
}

impl ClaudeProvider {
    #[must_use]
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: crate::http::default_client(),
            api_key,
            model,
            max_tokens,
            base_url: API_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send_request(&self, prompt: &str) -> Result<String, LlmError> {
        let body = RequestBody {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: &[ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        let text = response.text().await.map_err(LlmError::Http)?;

        if !status.is_success() {
            tracing::error!("Claude API error {status}: {text}");
            return Err(LlmError::Api {
                provider: "claude",
                status: status.as_u16(),
            });
        }

        let resp: ApiResponse = serde_json::from_str(&text)?;

        resp.content
            .first()
            .map(|c| c.text.clone())
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyResponse { provider: "claude" })
    }
}

impl CompletionProvider for ClaudeProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.send_request(prompt).await
    }

    fn name(&self) -> &'static str {
        "claude"
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ApiMessage<'a>],
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_returns_claude() {
        let provider = ClaudeProvider::new("key".into(), "claude-sonnet-4-20250514".into(), 4000);
        assert_eq!(provider.name(), "claude");
    }

    #[test]
    fn debug_redacts_api_key() {
        let provider =
            ClaudeProvider::new("sk-ant-secret".into(), "claude-sonnet-4-20250514".into(), 4000);
        let debug = format!("{provider:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("4000"));
    }

    #[test]
    fn request_body_serializes() {
        let body = RequestBody {
            model: "claude-sonnet-4-20250514",
            max_tokens: 4000,
            messages: &[ApiMessage {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"model\":\"claude-sonnet-4-20250514\""));
        assert!(json.contains("\"max_tokens\":4000"));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"hello\""));
    }

    #[test]
    fn response_extracts_first_block() {
        let json = r#"{"content":[{"text":"first"},{"text":"second"}]}"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.content.len(), 2);
        assert_eq!(resp.content[0].text, "first");
    }

    #[test]
    fn response_tolerates_empty_content() {
        let resp: ApiResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(resp.content.is_empty());
    }

    #[tokio::test]
    async fn generate_with_unreachable_endpoint_errors() {
        let provider = ClaudeProvider::new("key".into(), "model".into(), 4000)
            .with_base_url("http://127.0.0.1:1/v1/messages");
        let result = provider.generate("test").await;
        assert!(result.is_err());
    }

    #[test]
    fn clone_preserves_fields() {
        let provider = ClaudeProvider::new("k".into(), "claude-3-5-haiku-20241022".into(), 2048);
        let cloned = provider.clone();
        assert_eq!(cloned.model, provider.model);
        assert_eq!(cloned.max_tokens, 2048);
    }
}
