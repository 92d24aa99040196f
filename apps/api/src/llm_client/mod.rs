/// LLM Client: the single point of entry for all Gemini API calls.
///
/// No other module calls the Gemini API directly. Callers depend on the
/// `LanguageModel` trait so that handlers can run against a fake in tests.
///
/// Model output is untrusted: `call` with `expect_json` only promises that a
/// `Structured` value parsed as JSON, never that it matches any schema.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

mod extract;
pub mod prompts;

pub use extract::extract_json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Model used when `LLM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    pub expect_json: bool,
}

impl CallOptions {
    pub fn json() -> Self {
        Self { expect_json: true }
    }
}

/// What came back from a model call.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmOutput {
    /// A JSON value found in the model's text.
    Structured(Value),
    /// Raw text, trimmed. Also the result when JSON was requested but none parsed.
    Text(String),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one prompt and returns the model's raw text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError>;

    /// Sends one prompt; with `expect_json`, pulls the first balanced JSON
    /// object or array out of the reply, tolerating surrounding prose.
    async fn call(
        &self,
        model: &str,
        prompt: &str,
        options: CallOptions,
    ) -> Result<LlmOutput, LlmError> {
        let text = self.generate(model, prompt).await?;

        if options.expect_json {
            if let Some(value) = extract_json(&text) {
                return Ok(LlmOutput::Structured(value));
            }
            warn!("No JSON found in model output: {}", text.trim());
        }

        Ok(LlmOutput::Text(text.trim().to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: String,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: model={model}, prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLlm;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_concatenates_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [
                    {"text": "[\"Buy milk\", "},
                    {"text": "\"Call plumber\"]"}
                ]}}],
                "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 9}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::with_base_url("test-key".into(), 5, &server.uri()).unwrap();
        let text = client.generate(DEFAULT_MODEL, "suggest").await.unwrap();
        assert_eq!(text, "[\"Buy milk\", \"Call plumber\"]");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let client = LlmClient::with_base_url("bad".into(), 5, &server.uri()).unwrap();
        let err = client.generate(DEFAULT_MODEL, "hi").await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = LlmClient::with_base_url("k".into(), 5, &server.uri()).unwrap();
        let err = client.generate(DEFAULT_MODEL, "hi").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_call_extracts_json_from_prose() {
        let llm = FakeLlm::replying("Sure! Here you go:\n```json\n{\"category\": \"Work\"}\n```");
        let output = llm.call(DEFAULT_MODEL, "p", CallOptions::json()).await.unwrap();
        assert_eq!(output, LlmOutput::Structured(json!({"category": "Work"})));
    }

    #[tokio::test]
    async fn test_call_falls_back_to_trimmed_text() {
        let llm = FakeLlm::replying("  I cannot help with that.  ");
        let output = llm.call(DEFAULT_MODEL, "p", CallOptions::json()).await.unwrap();
        assert_eq!(output, LlmOutput::Text("I cannot help with that.".into()));
    }

    #[tokio::test]
    async fn test_call_without_json_keeps_text() {
        let llm = FakeLlm::replying("{\"a\": 1}");
        let output = llm
            .call(DEFAULT_MODEL, "p", CallOptions::default())
            .await
            .unwrap();
        assert_eq!(output, LlmOutput::Text("{\"a\": 1}".into()));
    }
}
