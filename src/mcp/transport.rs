//! Tool transport abstraction
//!
//! The client talks to the remote tool server through these traits so the
//! rmcp-backed connection can be swapped for an in-memory one.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::TransportConfig;
use crate::llm::{ToolDefinition, ToolInputSchema};

/// A tool advertised by the remote server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw JSON schema of the tool input
    #[serde(default)]
    pub input_schema: Map<String, Value>,
}

impl ToolDescriptor {
    /// Descriptor with no description and an empty object schema
    pub fn new(name: impl Into<String>) -> Self {
        let mut input_schema = Map::new();
        input_schema.insert("type".to_string(), Value::String("object".to_string()));
        Self {
            name: name.into(),
            description: None,
            input_schema,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_input_schema(mut self, input_schema: Map<String, Value>) -> Self {
        self.input_schema = input_schema;
        self
    }

    /// Tool definition advertised to the model
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: ToolInputSchema::from_json(&self.input_schema),
        }
    }
}

/// One element of a tool call result
#[derive(Debug, Clone, PartialEq)]
pub enum ToolContent {
    Text(String),
    /// Non-text content (images, resources, ...) kept as raw JSON
    Other(Value),
}

impl ToolContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolContent::Text(text) => Some(text),
            ToolContent::Other(_) => None,
        }
    }
}

/// Result of a remote tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallOutput {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolCallOutput {
    /// Successful result holding a single text element
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text(text.into())],
            is_error: false,
        }
    }

    /// Text of the first content element, if it is text
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(ToolContent::as_text)
    }

    /// All content flattened to one string for the model
    pub fn joined(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text(text) => text.clone(),
                ToolContent::Other(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// An open connection to a tool server
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Full tool catalog, all pages
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    /// Invoke `name` with `arguments`; `call_id` identifies the call in logs
    async fn call_tool(
        &self,
        call_id: &str,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallOutput>;
}

/// Opens [`ToolTransport`]s
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(&self, config: TransportConfig) -> Result<Arc<dyn ToolTransport>>;
}
