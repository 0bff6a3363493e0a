//! Test doubles shared by the unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::agent::{Agent, AgentFactory, AgentSpec};
use crate::auth::{AuthError, TokenSource};
use crate::core::ClientConfig;
use crate::llm::{LlmProvider, Message, MessageResponse, ToolDefinition};
use crate::mcp::{ToolCallOutput, ToolDescriptor, ToolTransport, TransportConfig, TransportConnector};

// ============================================================================
// HTTP
// ============================================================================

/// A request captured by [`MockHttpServer`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request line and headers
    pub head: String,
    pub body: String,
}

/// Minimal HTTP/1.1 server answering with canned responses
///
/// Responses are served in order; the last one repeats once the list runs out.
pub struct MockHttpServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpServer {
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server_hits = hits.clone();
        let server_requests = requests.clone();
        tokio::spawn(async move {
            let mut queue: VecDeque<(u16, String)> = responses.into();
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let request = read_request(&mut socket).await;
                server_requests.lock().unwrap().push(request);
                server_hits.fetch_add(1, Ordering::SeqCst);

                let (status, body) = if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue.front().cloned().unwrap_or((404, String::new()))
                };

                let response = format!(
                    "HTTP/1.1 {} MOCK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            url,
            hits,
            requests,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            if buf.len() >= pos + 4 + content_length {
                let body = String::from_utf8_lossy(&buf[pos + 4..pos + 4 + content_length]).to_string();
                return RecordedRequest { head, body };
            }
        }
    }

    RecordedRequest {
        head: String::from_utf8_lossy(&buf).to_string(),
        body: String::new(),
    }
}

// ============================================================================
// Config
// ============================================================================

/// Valid configuration for tenant `tenant_abc` with an OpenAI key
pub fn test_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| {
        let value = match key {
            "OAUTH_CLIENT_ID" => "test_client",
            "OAUTH_CLIENT_SECRET" => "test_secret",
            "RELTIO_TENANT_ID" => "tenant_abc",
            "OPENAI_API_KEY" => "sk-test",
            _ => return None,
        };
        Some(value.to_string())
    })
    .unwrap()
    .with_system_prompt_file("/nonexistent/system_prompt.txt")
}

// ============================================================================
// Token source
// ============================================================================

/// Token source returning a fixed token, or failing every time
pub struct StaticTokenSource {
    token: Option<String>,
    calls: AtomicUsize,
}

impl StaticTokenSource {
    pub fn new(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            token: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.token {
            Some(token) => Ok(token.clone()),
            None => Err(AuthError::Status {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "invalid_client".to_string(),
            }),
        }
    }
}

// ============================================================================
// MCP transport
// ============================================================================

/// Scripted reply for a tool call
#[derive(Clone)]
pub enum ToolReply {
    Output(ToolCallOutput),
    Fail(String),
}

/// In-memory tool transport recording every call
pub struct FakeTransport {
    tools: Vec<ToolDescriptor>,
    replies: Mutex<VecDeque<ToolReply>>,
    list_calls: AtomicUsize,
    pub calls: Mutex<Vec<(String, String, Map<String, Value>)>>,
}

impl FakeTransport {
    pub fn new(tool_names: &[&str]) -> Self {
        Self {
            tools: tool_names.iter().map(|name| ToolDescriptor::new(*name)).collect(),
            replies: Mutex::new(VecDeque::new()),
            list_calls: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(self, reply: ToolReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolTransport for FakeTransport {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        call_id: &str,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((call_id.to_string(), name.to_string(), arguments));

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ToolReply::Output(output)) => Ok(output),
            Some(ToolReply::Fail(message)) => Err(anyhow!(message)),
            None => Ok(ToolCallOutput::text("{}")),
        }
    }
}

/// Connector handing out one shared [`FakeTransport`]
pub struct FakeConnector {
    pub transport: Arc<FakeTransport>,
    fail: bool,
    pub configs: Mutex<Vec<TransportConfig>>,
}

impl FakeConnector {
    pub fn new(transport: FakeTransport) -> Self {
        Self {
            transport: Arc::new(transport),
            fail: false,
            configs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(FakeTransport::new(&[]))
        }
    }

    pub fn connects(&self) -> usize {
        self.configs.lock().unwrap().len()
    }
}

#[async_trait]
impl TransportConnector for FakeConnector {
    async fn connect(&self, config: TransportConfig) -> Result<Arc<dyn ToolTransport>> {
        self.configs.lock().unwrap().push(config);
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.transport.clone())
    }
}

// ============================================================================
// Agent
// ============================================================================

/// Agent echoing prompts, or failing every turn
pub struct EchoAgent {
    fail: bool,
}

#[async_trait]
impl Agent for EchoAgent {
    async fn run(&self, prompt: &str) -> Result<String> {
        if self.fail {
            return Err(anyhow!("model unavailable"));
        }
        Ok(format!("echo: {}", prompt))
    }
}

/// Agent factory recording the specs it was asked to build
#[derive(Default)]
pub struct RecordingAgentFactory {
    pub specs: Mutex<Vec<(String, Vec<String>, String)>>,
    pub failing_agents: bool,
}

impl AgentFactory for RecordingAgentFactory {
    fn create(&self, spec: AgentSpec) -> Result<Box<dyn Agent>> {
        self.specs.lock().unwrap().push((
            spec.system_prompt.clone(),
            spec.tools.iter().map(|t| t.name.clone()).collect(),
            spec.model.model_id.clone(),
        ));
        Ok(Box::new(EchoAgent {
            fail: self.failing_agents,
        }))
    }
}

// ============================================================================
// LLM
// ============================================================================

/// LLM provider replaying scripted responses and recording requests
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<MessageResponse>>,
    pub requests: Mutex<Vec<(Vec<Message>, Option<String>, Vec<String>)>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<MessageResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn send_with_tools(
        &self,
        messages: Vec<Message>,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessageResponse> {
        self.requests.lock().unwrap().push((
            messages,
            system.map(str::to_string),
            tools.into_iter().map(|t| t.name).collect(),
        ));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted response left"))
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}
