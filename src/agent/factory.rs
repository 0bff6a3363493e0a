//! Agent construction
//!
//! The client never builds an agent directly; it hands an [`AgentSpec`] to an
//! [`AgentFactory`], so the reasoning loop can be replaced wholesale.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::config::{AgentConfig, DEFAULT_MAX_TOOL_ITERATIONS};
use super::standard_loop::StandardAgent;
use crate::llm::{create_llm_provider, ModelSettings};
use crate::mcp::{McpToolAdapter, ToolDescriptor, ToolTransport};
use crate::tools::ToolRegistry;

/// A conversational agent
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run one prompt to completion and return the final text
    async fn run(&self, prompt: &str) -> Result<String>;
}

/// Everything an agent is built from
pub struct AgentSpec {
    /// Instruction text, tenant clause included
    pub system_prompt: String,
    pub tools: Arc<Vec<ToolDescriptor>>,
    pub model: ModelSettings,
    /// Live connection the tools are called through
    pub transport: Arc<dyn ToolTransport>,
}

/// Builds agents from an [`AgentSpec`]
pub trait AgentFactory: Send + Sync {
    fn create(&self, spec: AgentSpec) -> Result<Box<dyn Agent>>;
}

/// Factory producing [`StandardAgent`]s backed by the selected model provider
#[derive(Debug, Clone)]
pub struct StandardAgentFactory {
    max_tool_iterations: usize,
}

impl StandardAgentFactory {
    pub fn new() -> Self {
        Self {
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }
}

impl Default for StandardAgentFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentFactory for StandardAgentFactory {
    fn create(&self, spec: AgentSpec) -> Result<Box<dyn Agent>> {
        let llm = create_llm_provider(&spec.model)?;

        let mut registry = ToolRegistry::new();
        for tool in McpToolAdapter::from_catalog(&spec.tools, &spec.transport) {
            registry.register(tool);
        }

        tracing::info!(
            "[AgentFactory] Creating agent on {} with {} tools",
            llm.model(),
            registry.len()
        );

        let config = AgentConfig::new(spec.system_prompt)
            .with_tools(Arc::new(registry))
            .with_max_tool_iterations(self.max_tool_iterations);

        Ok(Box::new(StandardAgent::new(config, llm)))
    }
}
