//! OpenAI Chat Completions client
//!
//! Translates between the internal message types (Anthropic format) and the
//! Chat Completions wire format:
//!
//! - the system prompt becomes a leading `system` message
//! - `tool_use` blocks become assistant `tool_calls` with JSON-encoded arguments
//! - `tool_result` blocks become `tool` role messages keyed by `tool_call_id`

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::auth::AuthConfig;
use super::provider::LlmProvider;
use super::types::{
    ContentBlock, Message, MessageContent, MessageResponse, Role, StopReason, ToolDefinition,
    Usage,
};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

// ============================================================================
// OpenAI-specific request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatTool>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ChatMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ChatToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ChatToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: ChatFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ChatFunctionCall {
    name: String,
    /// JSON-encoded argument object
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ChatFunction,
}

#[derive(Debug, Serialize)]
struct ChatFunction {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

// ============================================================================
// Provider
// ============================================================================

/// OpenAI LLM provider
pub struct OpenAiProvider {
    client: Client,
    auth: AuthConfig,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with a specific API key
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(Self::with_auth(AuthConfig::new(api_key)))
    }

    /// Create a new OpenAI provider from a full auth config
    pub fn with_auth(auth: AuthConfig) -> Self {
        Self {
            client: Client::new(),
            auth,
            model: "gpt-4.1".to_string(),
            max_tokens: 4096,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    // ========================================================================
    // Conversion: internal -> OpenAI
    // ========================================================================

    fn convert_messages(messages: &[Message], system: Option<&str>) -> Vec<ChatMessage> {
        let mut chat_messages = Vec::with_capacity(messages.len() + 1);

        if let Some(system) = system {
            chat_messages.push(ChatMessage::text("system", system));
        }

        for msg in messages {
            match &msg.content {
                MessageContent::Text(text) => {
                    chat_messages.push(ChatMessage::text(msg.role.as_str(), text.clone()));
                }
                MessageContent::Blocks(blocks) if msg.role == Role::Assistant => {
                    chat_messages.push(Self::convert_assistant_blocks(blocks));
                }
                MessageContent::Blocks(blocks) => {
                    chat_messages.extend(Self::convert_user_blocks(blocks));
                }
            }
        }

        chat_messages
    }

    fn convert_assistant_blocks(blocks: &[ContentBlock]) -> ChatMessage {
        let text: String = blocks.iter().filter_map(|b| b.as_text()).collect();
        let tool_calls: Vec<ChatToolCall> = blocks
            .iter()
            .filter_map(|b| b.as_tool_use())
            .map(|(id, name, input)| ChatToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: ChatFunctionCall {
                    name: name.to_string(),
                    arguments: input.to_string(),
                },
            })
            .collect();

        ChatMessage {
            role: "assistant".to_string(),
            content: if text.is_empty() { None } else { Some(text) },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        }
    }

    /// Tool results must directly follow the assistant turn, so they go first
    fn convert_user_blocks(blocks: &[ContentBlock]) -> Vec<ChatMessage> {
        let mut out = Vec::new();
        let mut text = String::new();

        for block in blocks {
            match block {
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    ..
                } => out.push(ChatMessage {
                    role: "tool".to_string(),
                    content: Some(content.clone().unwrap_or_default()),
                    tool_calls: None,
                    tool_call_id: Some(tool_use_id.clone()),
                }),
                ContentBlock::Text { text: t } => text.push_str(t),
                ContentBlock::ToolUse { .. } | ContentBlock::Unknown => {}
            }
        }

        if !text.is_empty() {
            out.push(ChatMessage::text("user", text));
        }
        out
    }

    fn convert_tools(tools: Vec<ToolDefinition>) -> Option<Vec<ChatTool>> {
        if tools.is_empty() {
            return None;
        }

        Some(
            tools
                .into_iter()
                .map(|tool| ChatTool {
                    tool_type: "function",
                    function: ChatFunction {
                        parameters: tool.input_schema.into_value(),
                        name: tool.name,
                        description: tool.description,
                    },
                })
                .collect(),
        )
    }

    // ========================================================================
    // Conversion: OpenAI -> internal
    // ========================================================================

    fn convert_response(&self, response: ChatResponse) -> Result<MessageResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .context("No choices in OpenAI response")?;

        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::text(text));
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            let input = serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                tracing::warn!(
                    "[OpenAI] Invalid arguments for tool call {}: {}",
                    call.function.name,
                    e
                );
                Value::Object(Map::new())
            });
            content.push(ContentBlock::tool_use(call.id, call.function.name, input));
        }

        let stop_reason = choice.finish_reason.as_deref().map(|r| match r {
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            "content_filter" => StopReason::Refusal,
            _ => StopReason::EndTurn,
        });

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(MessageResponse {
            id: response
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            content,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            stop_reason,
            usage,
        })
    }

    // ========================================================================
    // API methods
    // ========================================================================

    async fn send_request(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.auth.url_or(DEFAULT_API_URL);

        let request_json =
            serde_json::to_string(request).context("Failed to serialize OpenAI request")?;
        tracing::debug!("[OpenAI] Request JSON: {}", request_json);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.auth.api_key)
            .body(request_json)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read OpenAI response body")?;

        tracing::debug!("[OpenAI] Response status: {}", status);
        tracing::debug!("[OpenAI] Response body: {}", response_text);

        if !status.is_success() {
            tracing::error!("[OpenAI] API error: {} - {}", status, response_text);
            anyhow::bail!("OpenAI API error ({}): {}", status, response_text);
        }

        serde_json::from_str(&response_text).context("Failed to parse OpenAI API response")
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn send_with_tools(
        &self,
        messages: Vec<Message>,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessageResponse> {
        tracing::info!("[OpenAI] Sending message with tools");
        tracing::debug!("[OpenAI] Messages count: {}", messages.len());
        tracing::debug!("[OpenAI] Tools count: {}", tools.len());

        let request = ChatRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(&messages, system),
            tools: Self::convert_tools(tools),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.send_request(&request).await?;
        self.convert_response(response)
    }

    fn model(&self) -> String {
        self.model.clone()
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolInputSchema;
    use crate::testing::MockHttpServer;
    use serde_json::json;

    #[test]
    fn test_convert_tool_round() {
        let messages = vec![
            Message::user("find acme"),
            Message::assistant_with_blocks(vec![
                ContentBlock::text("Searching."),
                ContentBlock::tool_use("call_1", "search_entities", json!({"filter": "acme"})),
            ]),
            Message::user_with_blocks(vec![ContentBlock::tool_result("call_1", "[]", false)]),
        ];

        let chat = OpenAiProvider::convert_messages(&messages, Some("sys"));
        assert_eq!(chat.len(), 4);
        assert_eq!(chat[0], ChatMessage::text("system", "sys"));
        assert_eq!(chat[1], ChatMessage::text("user", "find acme"));

        assert_eq!(chat[2].content.as_deref(), Some("Searching."));
        let calls = chat[2].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].function.name, "search_entities");
        let args: Value = serde_json::from_str(&calls[0].function.arguments).unwrap();
        assert_eq!(args, json!({"filter": "acme"}));

        assert_eq!(chat[3].role, "tool");
        assert_eq!(chat[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(chat[3].content.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_send_with_tools_maps_tool_calls() {
        let server = MockHttpServer::start(vec![(
            200,
            json!({
                "id": "chatcmpl-1",
                "model": "gpt-4.1",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_9",
                            "type": "function",
                            "function": {"name": "get_entity", "arguments": "{\"entity_id\":\"e1\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 20, "completion_tokens": 4, "total_tokens": 24}
            })
            .to_string(),
        )])
        .await;

        let llm = OpenAiProvider::with_auth(AuthConfig::with_base_url(
            "sk-test",
            format!("{}/v1/chat/completions", server.url),
        ))
        .with_temperature(0.2)
        .with_max_tokens(512);

        let tool = ToolDefinition {
            name: "get_entity".to_string(),
            description: Some("Fetch one entity".to_string()),
            input_schema: ToolInputSchema::object()
                .with_property("entity_id", json!({"type": "string"})),
        };
        let response = llm
            .send_with_tools(vec![Message::user("get e1")], Some("sys"), vec![tool])
            .await
            .unwrap();

        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(response.usage.input_tokens, 20);
        let uses = response.tool_uses();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].0, "call_9");
        assert_eq!(uses[0].2, &json!({"entity_id": "e1"}));

        let request = &server.requests()[0];
        assert!(request
            .head
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-test"));
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "get_entity");
        assert_eq!(
            body["tools"][0]["function"]["parameters"]["properties"]["entity_id"]["type"],
            "string"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_on_call() {
        let server = MockHttpServer::start(vec![(
            401,
            r#"{"error":{"message":"Incorrect API key provided"}}"#.into(),
        )])
        .await;

        let llm = OpenAiProvider::with_auth(AuthConfig::with_base_url("", server.url.clone()));
        let err = llm
            .send_with_tools(vec![Message::user("hi")], None, vec![])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OpenAI API error"));
    }

    #[test]
    fn test_finish_reason_length() {
        let llm = OpenAiProvider::new("k").unwrap();
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "partial"}, "finish_reason": "length"}]
        }))
        .unwrap();

        let converted = llm.convert_response(response).unwrap();
        assert_eq!(converted.stop_reason, Some(StopReason::MaxTokens));
        assert_eq!(converted.text(), "partial");
        assert_eq!(converted.model, "gpt-4.1");
    }
}
