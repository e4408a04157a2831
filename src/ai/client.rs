//! LLM (`OpenAI`) API client module
//!
//! Encapsulates all LLM API interactions for generating digests.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

use crate::core::config::AppConfig;
use crate::errors::DigestError;

const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const REQUEST_TIMEOUT_SECS: u64 = 300;

pub const SYSTEM_PROMPT: &str = "You are Newsroom-bot, a news summarization assistant. \
    You receive news articles with their source, url and text, and you aggregate insight from them. \
    Answer only from the provided context and never invent sources.";

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Single-shot text completion, the only capability the digest core needs.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// # Errors
    ///
    /// Returns `DigestError::SummarizationFailure` when the model call fails.
    async fn infer(&self, prompt: &str) -> Result<String, DigestError>;
}

/// LLM API client for generating digests
pub struct LlmClient {
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    http: Client,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        model_name: String,
    ) -> Result<Self, DigestError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                DigestError::HttpError(format!("Failed to build OpenAI HTTP client: {e}"))
            })?;

        Ok(Self {
            api_key,
            org_id,
            model_name,
            http,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, DigestError> {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_org_id.clone(),
            config.openai_model.clone(),
        )
    }

    #[must_use]
    pub fn build_prompt(&self, prompt: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(SYSTEM_PROMPT.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(prompt.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, DigestError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key)
            .parse()
            .map_err(|e| DigestError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert("Authorization", auth_value);

        if let Some(org) = &self.org_id {
            let org_value = org.parse().map_err(|e| {
                DigestError::HttpError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }
        Ok(headers)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP request to `OpenAI` fails or the response
    /// carries no output text.
    pub async fn generate(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<String, DigestError> {
        #[cfg(feature = "debug-logs")]
        info!("Using OpenAI prompt:\n{:?}", prompt);

        let estimated_input_tokens = prompt
            .iter()
            .map(|msg| match &msg.content {
                Content::Text(t) => estimate_tokens(t),
                Content::ImageUrl(_) => 0,
            })
            .sum::<usize>();
        info!(
            "Calling {} with {} messages (~{} input tokens)",
            self.model_name,
            prompt.len(),
            estimated_input_tokens
        );

        let request_body = json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(&prompt),
        });

        let response = self
            .http
            .post(OPENAI_RESPONSES_URL)
            .headers(self.headers()?)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                DigestError::SummarizationFailure(format!("OpenAI API request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(DigestError::SummarizationFailure(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            DigestError::SummarizationFailure(format!("Failed to parse OpenAI response: {e}"))
        })?;

        extract_output_text(&response_json)
            .ok_or_else(|| DigestError::SummarizationFailure("No text in response".to_string()))
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn infer(&self, prompt: &str) -> Result<String, DigestError> {
        self.generate(self.build_prompt(prompt)).await
    }
}

/// Pull the answer out of a Responses API payload: `output_text` when present,
/// otherwise every `output_text` part under `output[].content[]`.
pub(crate) fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let collected: Vec<&str> = response_json
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| {
            part.get("text").and_then(|t| {
                t.as_str()
                    .or_else(|| t.get("value").and_then(Value::as_str))
            })
        })
        .collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

/// Build Responses API input payload from a chat-style prompt.
/// Assistant turns are dropped; only text parts are forwarded.
pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter(|m| !matches!(m.role, MessageRole::assistant))
        .filter_map(|m| {
            let Content::Text(text) = &m.content else {
                return None;
            };
            let role_str = match m.role {
                MessageRole::system => "system",
                _ => "user",
            };
            Some(json!({
                "role": role_str,
                "content": [{ "type": "input_text", "text": text }]
            }))
        })
        .collect()
}
