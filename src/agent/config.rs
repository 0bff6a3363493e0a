use std::sync::Arc;

use crate::llm::ToolDefinition;
use crate::tools::ToolRegistry;

/// Model calls allowed for a single prompt before the agent gives up
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 100;

/// Settings of one [`StandardAgent`](super::StandardAgent)
pub struct AgentConfig {
    /// Final system prompt, tenant clause already appended
    pub system_prompt: String,
    pub tools: Option<Arc<ToolRegistry>>,
    pub max_tool_iterations: usize,
}

impl AgentConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            tools: None,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .as_ref()
            .map(|registry| registry.get_definitions())
            .unwrap_or_default()
    }
}
