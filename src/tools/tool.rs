//! What the agent loop sees of a callable tool

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::llm::ToolDefinition;

/// Text handed back to the model for one tool call
///
/// A failed call is still a result: the model sees the error text and
/// decides what to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub output: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self::new(output, false)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, true)
    }

    pub fn new(output: impl Into<String>, is_error: bool) -> Self {
        Self {
            output: output.into(),
            is_error,
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Name, description and input schema as advertised to the model
    fn definition(&self) -> ToolDefinition;

    /// Run one call
    ///
    /// `call_id` is the model's tool-use id and travels with the call so the
    /// remote side can correlate it. `Err` is reserved for transport
    /// failures; tool-level failures come back as [`ToolResult::error`].
    async fn execute(&self, call_id: &str, input: &Value) -> Result<ToolResult>;
}
