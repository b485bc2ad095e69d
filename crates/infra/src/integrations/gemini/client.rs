//! Gemini API client implementing the `QuestionGenerator` port.

use async_trait::async_trait;
use chronos_core::QuestionGenerator;
use chronos_domain::{ChronosError, GeneratedQuestion, Result as DomainResult};
use reqwest::Method;
use tracing::{debug, info};

use super::types::{
    Content, GeminiError, GenerateContentRequest, GenerateContentResponse, Part,
};
use crate::http::HttpClient;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini API client for generating quiz questions.
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: String, http: HttpClient) -> Self {
        Self {
            http,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
        }
    }

    /// Use a specific model instead of the default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (for testing).
    #[cfg(test)]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    async fn call_api(&self, prompt: String) -> Result<Vec<GeneratedQuestion>, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };

        let request = self
            .http
            .request(Method::POST, &url)
            .header("Content-Type", "application/json")
            .json(&payload);

        let response = self.http.send(request).await.map_err(|err| match err {
            ChronosError::Network(msg) => GeminiError::Network(msg),
            other => GeminiError::Network(other.to_string()),
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "received Gemini API response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => GeminiError::Authentication(message),
                429 => GeminiError::RateLimit(60),
                code => GeminiError::Api { status: code, message },
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GeminiError::InvalidResponse(format!("failed to parse body: {err}")))?;

        let text = body
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .ok_or_else(|| GeminiError::InvalidResponse("response contained no candidates".into()))?;

        if text.trim().is_empty() {
            return Err(GeminiError::InvalidResponse("model returned empty text".into()));
        }

        let cleaned = strip_code_fences(text);
        let questions: Vec<GeneratedQuestion> = serde_json::from_str(cleaned).map_err(|err| {
            GeminiError::InvalidResponse(format!(
                "failed to decode question JSON: {err}. Content: {cleaned}"
            ))
        })?;

        Ok(questions)
    }
}

/// The model frequently wraps JSON in markdown fences despite instructions.
fn strip_code_fences(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim_matches('`')
        .trim()
}

#[async_trait]
impl QuestionGenerator for GeminiClient {
    async fn generate(&self, system: &str, user: &str) -> DomainResult<Vec<GeneratedQuestion>> {
        let prompt = format!("{system}\n\n{user}");
        let questions = self.call_api(prompt).await.map_err(|err| match err {
            GeminiError::Authentication(msg) => {
                ChronosError::Auth(format!("Gemini authentication failed: {msg}"))
            }
            GeminiError::Network(msg) => ChronosError::Network(msg),
            other => ChronosError::Internal(other.to_string()),
        })?;

        info!(count = questions.len(), "generated quiz questions");
        Ok(questions)
    }
}
