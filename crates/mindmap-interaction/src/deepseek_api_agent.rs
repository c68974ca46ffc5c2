//! DeepSeekApiAgent - Direct REST client for an OpenAI-compatible provider.
//!
//! Serves both upstream contracts: credential validation against the
//! models-listing endpoint and single-shot chat completions.

use crate::prompt::MINDMAP_SYSTEM_PROMPT;
use async_trait::async_trait;
use mindmap_core::config::UpstreamConfig;
use mindmap_core::credential::Credential;
use mindmap_core::error::{MindmapError, Result};
use mindmap_core::upstream::{CompletionGateway, CredentialValidator};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MODELS_PATH: &str = "/models";
const COMPLETIONS_PATH: &str = "/chat/completions";

/// Client for the upstream inference provider.
#[derive(Clone)]
pub struct DeepSeekApiAgent {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
}

impl DeepSeekApiAgent {
    /// Builds an agent from configuration, with explicit request and connect
    /// timeouts on the underlying HTTP client.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| MindmapError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| MINDMAP_SYSTEM_PROMPT.to_string()),
        })
    }

    /// Overrides the base URL after construction.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request<'a>(&'a self, message: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    async fn send_request(
        &self,
        body: &ChatCompletionRequest<'_>,
        credential: &Credential,
    ) -> Result<String> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .bearer_auth(credential.expose())
            .json(body)
            .send()
            .await
            .map_err(|err| MindmapError::upstream(format!("Completion request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read upstream error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let body_text = response
            .text()
            .await
            .map_err(|err| MindmapError::upstream(format!("Failed to read completion body: {err}")))?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body_text)
            .map_err(|err| MindmapError::malformed(format!("Failed to parse completion: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CredentialValidator for DeepSeekApiAgent {
    async fn validate(&self, credential: &Credential) -> bool {
        if credential.is_empty() {
            return false;
        }

        let result = self
            .client
            .get(format!("{}{}", self.base_url, MODELS_PATH))
            .bearer_auth(credential.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                let body_text = response.text().await.unwrap_or_default();
                match serde_json::from_str::<ModelList>(&body_text) {
                    Ok(models) => {
                        tracing::debug!(
                            "[Upstream] Credential accepted ({} models listed)",
                            models.data.len()
                        );
                        true
                    }
                    Err(err) => {
                        tracing::warn!(
                            "[Upstream] Credential validation got an unrecognized model listing: {}",
                            err
                        );
                        false
                    }
                }
            }
            Ok(response) => {
                let status = response.status();
                let body_text = response.text().await.unwrap_or_default();
                tracing::warn!(
                    "[Upstream] Credential validation failed: {} {}",
                    status,
                    upstream_message(&body_text)
                );
                false
            }
            Err(err) => {
                tracing::warn!("[Upstream] Credential validation error: {}", err);
                false
            }
        }
    }
}

#[async_trait]
impl CompletionGateway for DeepSeekApiAgent {
    async fn complete(&self, message: &str, credential: &Credential) -> Result<String> {
        let request = self.build_request(message);
        tracing::debug!(
            "[Upstream] Requesting completion (model={}, {} chars)",
            self.model,
            message.chars().count()
        );
        self.send_request(&request, credential).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Only the shape matters: a 2xx reply without a `data` array is not the provider.
#[derive(Deserialize)]
struct ModelList {
    data: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| MindmapError::malformed("Upstream returned no completion content"))
}

/// Pulls the provider's error message out of an error body, falling back to the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string())
}

fn map_http_error(status: StatusCode, body: String) -> MindmapError {
    MindmapError::upstream_status(status.as_u16(), upstream_message(&body))
}
