//! Anthropic Messages API client
//!
//! The internal message types already follow the Messages API format, so
//! requests and responses go over the wire without translation.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;

use super::auth::AuthConfig;
use super::provider::LlmProvider;
use super::types::{Message, MessageResponse, ToolDefinition};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Anthropic LLM provider
pub struct AnthropicProvider {
    client: Client,
    auth: AuthConfig,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with a specific API key
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(Self::with_auth(AuthConfig::new(api_key)))
    }

    /// Create a new Anthropic provider from a full auth config
    pub fn with_auth(auth: AuthConfig) -> Self {
        Self {
            client: Client::new(),
            auth,
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 4096,
            temperature: None,
        }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the max tokens for responses
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    async fn send_request(&self, request: &MessagesRequest<'_>) -> Result<MessageResponse> {
        let url = self.auth.url_or(DEFAULT_API_URL);

        let request_json =
            serde_json::to_string(request).context("Failed to serialize Anthropic request")?;
        tracing::debug!("[Anthropic] Request JSON: {}", request_json);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.auth.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .body(request_json)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read Anthropic response body")?;

        tracing::debug!("[Anthropic] Response status: {}", status);
        tracing::debug!("[Anthropic] Response body: {}", response_text);

        if !status.is_success() {
            tracing::error!("[Anthropic] API error: {} - {}", status, response_text);
            anyhow::bail!("Anthropic API error ({}): {}", status, response_text);
        }

        serde_json::from_str(&response_text).context("Failed to parse Anthropic API response")
    }
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    async fn send_with_tools(
        &self,
        messages: Vec<Message>,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessageResponse> {
        tracing::info!("[Anthropic] Sending message with tools");
        tracing::debug!("[Anthropic] Messages count: {}", messages.len());
        tracing::debug!("[Anthropic] Tools count: {}", tools.len());

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: &messages,
            system,
            tools: (!tools.is_empty()).then_some(tools.as_slice()),
            temperature: self.temperature,
        };
        self.send_request(&request).await
    }

    fn model(&self) -> String {
        self.model.clone()
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}
