//! Standard Agent Loop
//!
//! Default agent: prompt → LLM → tools → LLM ... until the model stops asking
//! for tools. Conversation history is kept across prompts.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::llm::{ContentBlock, LlmProvider, Message, StopReason};
use crate::tools::ToolResult;

use super::config::AgentConfig;
use super::factory::Agent;

/// Standard agent that handles the full tool-use loop
pub struct StandardAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmProvider>,
    history: Mutex<Vec<Message>>,
}

impl StandardAgent {
    /// Create a new standard agent
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            config,
            llm,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    /// Number of messages in the conversation so far
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    /// Process a single user turn (may involve multiple LLM calls for tool use)
    async fn process_turn(&self, history: &mut Vec<Message>, user_input: &str) -> Result<String> {
        history.push(Message::user(user_input));

        let tool_definitions = self.config.tool_definitions();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.config.max_tool_iterations {
                tracing::warn!(
                    "[StandardAgent] Max tool iterations ({}) reached",
                    self.config.max_tool_iterations
                );
                return Err(anyhow!(
                    "Max tool iterations ({}) reached",
                    self.config.max_tool_iterations
                ));
            }

            tracing::info!(
                "[StandardAgent] Calling {} with {} messages (iteration {})",
                self.llm.provider_name(),
                history.len(),
                iterations
            );

            let response = self
                .llm
                .send_with_tools(
                    history.clone(),
                    Some(&self.config.system_prompt),
                    tool_definitions.clone(),
                )
                .await?;

            tracing::info!(
                "[StandardAgent] LLM response: stop_reason={:?}",
                response.stop_reason
            );

            let mut tool_results: Vec<(String, ToolResult)> = Vec::new();
            for (id, name, input) in response.tool_uses() {
                tracing::info!("[StandardAgent] Tool use: {} ({})", name, id);

                let result = match self.config.tools {
                    Some(ref tools) => match tools.execute(id, name, input).await {
                        Ok(result) => result,
                        Err(e) => {
                            tracing::warn!("[StandardAgent] Tool {} failed: {:#}", name, e);
                            ToolResult::error(format!("Error: {:#}", e))
                        }
                    },
                    None => ToolResult::error(format!(
                        "No tools configured, cannot execute: {}",
                        name
                    )),
                };
                tool_results.push((id.to_string(), result));
            }

            let text = response.text();
            let blocks: Vec<ContentBlock> = response
                .content
                .into_iter()
                .filter(|block| !block.is_unknown())
                .collect();
            if !blocks.is_empty() {
                history.push(Message::assistant_with_blocks(blocks));
            }

            if !tool_results.is_empty() {
                let tool_result_blocks: Vec<ContentBlock> = tool_results
                    .into_iter()
                    .map(|(id, result)| ContentBlock::tool_result(id, result.output, result.is_error))
                    .collect();
                history.push(Message::user_with_blocks(tool_result_blocks));
                continue;
            }

            match response.stop_reason {
                Some(StopReason::MaxTokens) => {
                    tracing::warn!("[StandardAgent] Response truncated (max tokens)");
                }
                Some(StopReason::Refusal) => {
                    tracing::warn!("[StandardAgent] Model refused to respond");
                }
                _ => {}
            }

            return Ok(text);
        }
    }
}

#[async_trait]
impl Agent for StandardAgent {
    async fn run(&self, prompt: &str) -> Result<String> {
        let mut history = self.history.lock().await;
        let checkpoint = history.len();

        match self.process_turn(&mut history, prompt).await {
            Ok(text) => Ok(text),
            Err(e) => {
                // drop the partial turn so the next prompt starts from a valid history
                history.truncate(checkpoint);
                Err(e)
            }
        }
    }
}
