//! Model provider clients
//!
//! Both providers implement [`LlmProvider`] over the same Anthropic-format
//! message types; [`select_provider`] decides which one a session uses.

pub mod anthropic;
pub mod auth;
pub mod openai;
pub mod provider;
pub mod selection;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use auth::AuthConfig;
pub use openai::OpenAiProvider;
pub use provider::LlmProvider;
pub use selection::{create_llm_provider, select_provider, ModelProvider, ModelSettings};
pub use types::{
    ContentBlock, Message, MessageContent, MessageResponse, Role, StopReason, ToolDefinition,
    ToolInputSchema, Usage,
};
