use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::provider::CompletionProvider;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Clone for GeminiProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl GeminiProvider {
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: crate::http::default_client(),
            api_key,
            model,
            base_url: API_BASE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    async fn send_request(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
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
            tracing::error!("Gemini API error {status}: {text}");
            return Err(LlmError::Api {
                provider: "gemini",
                status: status.as_u16(),
            });
        }

        let resp: GenerateContentResponse = serde_json::from_str(&text)?;

        resp.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyResponse { provider: "gemini" })
    }
}

impl CompletionProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.send_request(prompt).await
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_returns_gemini() {
        let provider = GeminiProvider::new("key".into(), "gemini-2.5-flash".into());
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn debug_redacts_api_key() {
        let provider = GeminiProvider::new("sk-secret-key".into(), "gemini-2.5-flash".into());
        let debug = format!("{provider:?}");
        assert!(!debug.contains("sk-secret-key"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("gemini-2.5-flash"));
    }

    #[test]
    fn with_base_url_strips_trailing_slashes() {
        let provider = GeminiProvider::new("k".into(), "m".into())
            .with_base_url("http://localhost:8080/v1beta/models///");
        assert_eq!(provider.base_url, "http://localhost:8080/v1beta/models");
    }

    #[test]
    fn request_body_serializes() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"contents":[{"parts":[{"text":"hello"}]}]}"#);
    }

    #[test]
    fn response_extracts_candidate_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"pong"}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.candidates[0].content.parts[0].text, "pong");
    }

    #[test]
    fn response_tolerates_missing_candidates() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.candidates.is_empty());
    }

    #[tokio::test]
    async fn generate_with_unreachable_endpoint_errors() {
        let provider =
            GeminiProvider::new("key".into(), "model".into()).with_base_url("http://127.0.0.1:1");
        let result = provider.generate("test").await;
        assert!(result.is_err());
    }

    #[test]
    fn clone_preserves_fields() {
        let provider = GeminiProvider::new("my-key".into(), "gemini-2.5-pro".into());
        let cloned = provider.clone();
        assert_eq!(cloned.model, provider.model);
        assert_eq!(cloned.api_key, provider.api_key);
    }
}
