//! Model provider selection
//!
//! The provider is picked from which API keys are present. OpenAI is the
//! primary provider and wins ties; Anthropic is used only when it is the
//! sole key. With no keys at all OpenAI is still returned, and the missing
//! key surfaces as an error on the first model call rather than here.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::provider::LlmProvider;

/// Model providers the client can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    /// Primary provider
    OpenAi,
    /// Secondary provider
    Anthropic,
}

impl ModelProvider {
    /// Model used when `MODEL_ID` is not set
    pub fn default_model_id(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "gpt-4.1",
            ModelProvider::Anthropic => "claude-3-5-sonnet-20241022",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "openai",
            ModelProvider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick a provider from the two candidate API keys
pub fn select_provider(openai_api_key: &str, anthropic_api_key: &str) -> ModelProvider {
    if !openai_api_key.is_empty() {
        ModelProvider::OpenAi
    } else if !anthropic_api_key.is_empty() {
        ModelProvider::Anthropic
    } else {
        ModelProvider::OpenAi
    }
}

/// Everything needed to build a model client
#[derive(Clone)]
pub struct ModelSettings {
    pub provider: ModelProvider,
    pub model_id: String,
    /// Sampling temperature in [0, 2]
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key: String,
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("provider", &self.provider)
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("has_api_key", &!self.api_key.is_empty())
            .finish()
    }
}

/// Build the provider-specific model client for `settings`
pub fn create_llm_provider(settings: &ModelSettings) -> Result<Arc<dyn LlmProvider>> {
    tracing::info!(
        "[ModelSelection] Creating {} model: {} (max_tokens: {}, temperature: {})",
        settings.provider,
        settings.model_id,
        settings.max_tokens,
        settings.temperature
    );

    let provider: Arc<dyn LlmProvider> = match settings.provider {
        ModelProvider::OpenAi => Arc::new(
            OpenAiProvider::new(&settings.api_key)?
                .with_model(&settings.model_id)
                .with_max_tokens(settings.max_tokens)
                .with_temperature(settings.temperature),
        ),
        ModelProvider::Anthropic => Arc::new(
            AnthropicProvider::new(&settings.api_key)?
                .with_model(&settings.model_id)
                .with_max_tokens(settings.max_tokens)
                .with_temperature(settings.temperature),
        ),
    };

    Ok(provider)
}
