//! LLM Provider trait
//!
//! Abstracts the model API so the OpenAI and Anthropic backends can be used
//! interchangeably by the agent loop.

use anyhow::Result;

use super::types::{Message, MessageResponse, ToolDefinition};

/// Trait for LLM providers that can be used with StandardAgent.
///
/// All providers work with the same internal message types (which follow
/// Anthropic's format). Providers that use a different wire format (OpenAI)
/// handle translation internally.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request with tools and system prompt, returning the full response.
    async fn send_with_tools(
        &self,
        messages: Vec<Message>,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessageResponse>;

    /// Get the current model name.
    fn model(&self) -> String;

    /// Get the provider name (e.g., "openai", "anthropic").
    fn provider_name(&self) -> &str;
}
