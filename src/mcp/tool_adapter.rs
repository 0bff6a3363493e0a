//! MCP Tool Adapter
//!
//! Adapts remote tools to implement the agent's Tool trait

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::transport::{ToolDescriptor, ToolTransport};
use crate::llm::ToolDefinition;
use crate::tools::{Tool, ToolResult};

/// Adapter that wraps a remote tool to implement the Tool trait
pub struct McpToolAdapter {
    descriptor: ToolDescriptor,
    transport: Arc<dyn ToolTransport>,
}

impl McpToolAdapter {
    pub fn new(descriptor: ToolDescriptor, transport: Arc<dyn ToolTransport>) -> Self {
        Self {
            descriptor,
            transport,
        }
    }

    /// One adapter per descriptor, all sharing `transport`
    pub fn from_catalog(
        tools: &[ToolDescriptor],
        transport: &Arc<dyn ToolTransport>,
    ) -> Vec<Arc<dyn Tool>> {
        tools
            .iter()
            .map(|descriptor| {
                Arc::new(Self::new(descriptor.clone(), transport.clone())) as Arc<dyn Tool>
            })
            .collect()
    }
}

#[async_trait]
impl Tool for McpToolAdapter {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn definition(&self) -> ToolDefinition {
        self.descriptor.to_definition()
    }

    async fn execute(&self, call_id: &str, input: &Value) -> Result<ToolResult> {
        tracing::info!("[McpToolAdapter] Executing '{}'", self.descriptor.name);
        tracing::debug!("[McpToolAdapter] Input: {}", input);

        let arguments = match input {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                return Ok(ToolResult::error(format!(
                    "Tool input must be a JSON object, got: {}",
                    other
                )))
            }
        };

        let output = self
            .transport
            .call_tool(call_id, &self.descriptor.name, arguments)
            .await?;

        tracing::debug!(
            "[McpToolAdapter] Tool '{}' completed. Is error: {}",
            self.descriptor.name,
            output.is_error
        );

        Ok(ToolResult::new(output.joined(), output.is_error))
    }
}
