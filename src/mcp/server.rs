//! rmcp-backed tool transport
//!
//! Wraps an rmcp streamable-HTTP client session to the remote tool server.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use rmcp::model::{CallToolRequestParams, CallToolResult, RawContent, Tool};
use rmcp::service::RunningService;
use rmcp::transport::{
    streamable_http_client::StreamableHttpClientTransportConfig, StreamableHttpClientTransport,
};
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Map, Value};

use super::config::TransportConfig;
use super::transport::{
    ToolCallOutput, ToolContent, ToolDescriptor, ToolTransport, TransportConnector,
};

/// The concrete transport type we use for HTTP MCP connections
pub type HttpClientTransport = StreamableHttpClientTransport<reqwest::Client>;

/// A live rmcp client session
pub struct McpConnection {
    endpoint: String,
    service: RunningService<RoleClient, ()>,
}

impl std::fmt::Debug for McpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpConnection")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl McpConnection {
    /// Open a session; every request carries the configured headers
    pub async fn connect(config: &TransportConfig) -> Result<Self> {
        tracing::info!("[McpConnection] Connecting to {}", config.endpoint);

        let http_client = reqwest::Client::builder()
            .default_headers(header_map(&config.headers)?)
            .build()
            .context("Failed to build MCP HTTP client")?;

        let transport: HttpClientTransport = StreamableHttpClientTransport::with_client(
            http_client,
            StreamableHttpClientTransportConfig::with_uri(config.endpoint.as_str()),
        );

        let service = ()
            .serve(transport)
            .await
            .with_context(|| format!("Failed to initialize MCP session with {}", config.endpoint))?;

        tracing::info!("[McpConnection] Connected to {}", config.endpoint);

        Ok(Self {
            endpoint: config.endpoint.clone(),
            service,
        })
    }
}

#[async_trait]
impl ToolTransport for McpConnection {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        tracing::debug!("[McpConnection] Listing tools from {}", self.endpoint);

        let tools = self
            .service
            .list_all_tools()
            .await
            .context("Failed to list MCP tools")?;

        tracing::info!("[McpConnection] Got {} tools", tools.len());

        Ok(tools.iter().map(descriptor_from_rmcp).collect())
    }

    async fn call_tool(
        &self,
        call_id: &str,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallOutput> {
        tracing::info!("[McpConnection] Calling tool '{}' ({})", name, call_id);
        tracing::debug!("[McpConnection] Arguments: {:?}", arguments);

        let result = self
            .service
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_string().into(),
                arguments: Some(arguments),
                task: None,
            })
            .await
            .with_context(|| format!("MCP tool call '{}' failed", name))?;

        tracing::debug!("[McpConnection] Tool call completed for '{}'", name);

        Ok(output_from_rmcp(result))
    }
}

/// Production [`TransportConnector`] opening rmcp sessions
#[derive(Debug, Default, Clone)]
pub struct RmcpConnector;

impl RmcpConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransportConnector for RmcpConnector {
    async fn connect(&self, config: TransportConfig) -> Result<Arc<dyn ToolTransport>> {
        let connection = McpConnection::connect(&config).await?;
        Ok(Arc::new(connection))
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name: {}", name))?;
        let mut header_value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header {}", name))?;
        if header_name == reqwest::header::AUTHORIZATION {
            header_value.set_sensitive(true);
        }
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Convert an rmcp tool definition
pub(crate) fn descriptor_from_rmcp(tool: &Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name.to_string(),
        description: tool.description.as_ref().map(|d| d.to_string()),
        input_schema: tool.input_schema.as_ref().clone(),
    }
}

/// Convert an rmcp tool call result
pub(crate) fn output_from_rmcp(result: CallToolResult) -> ToolCallOutput {
    let content = result
        .content
        .into_iter()
        .map(|item| match &item.raw {
            RawContent::Text(text) => ToolContent::Text(text.text.clone()),
            _ => ToolContent::Other(serde_json::to_value(&item).unwrap_or(Value::Null)),
        })
        .collect();

    ToolCallOutput {
        content,
        is_error: result.is_error.unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;
    use serde_json::json;

    #[test]
    fn test_descriptor_conversion() {
        let input_schema = Arc::new(
            serde_json::from_value(json!({
                "type": "object",
                "properties": {"entity_id": {"type": "string"}},
                "required": ["entity_id"]
            }))
            .unwrap(),
        );

        let rmcp_tool = Tool {
            name: "get_entity".into(),
            title: None,
            description: Some("Fetch an entity".into()),
            input_schema,
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        };

        let descriptor = descriptor_from_rmcp(&rmcp_tool);
        assert_eq!(descriptor.name, "get_entity");
        assert_eq!(descriptor.description.as_deref(), Some("Fetch an entity"));
        assert_eq!(descriptor.input_schema["required"], json!(["entity_id"]));
    }

    #[test]
    fn test_output_conversion() {
        let output = output_from_rmcp(CallToolResult::success(vec![Content::text(
            r#"{"status":"ok"}"#,
        )]));
        assert_eq!(output.first_text(), Some(r#"{"status":"ok"}"#));
        assert!(!output.is_error);

        let output = output_from_rmcp(CallToolResult::error(vec![Content::text("denied")]));
        assert!(output.is_error);

        let output = output_from_rmcp(CallToolResult::success(vec![Content::image(
            "aGVsbG8=",
            "image/png",
        )]));
        assert_eq!(output.first_text(), None);
        assert!(matches!(output.content[0], ToolContent::Other(_)));
    }

    #[test]
    fn test_header_map_marks_authorization_sensitive() {
        let config = TransportConfig::bearer("http://localhost/mcp", "tok");
        let map = header_map(&config.headers).unwrap();
        assert!(map[reqwest::header::AUTHORIZATION].is_sensitive());
        assert_eq!(map[reqwest::header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_header_map_rejects_bad_value() {
        let headers = vec![("X-Bad".to_string(), "line\nbreak".to_string())];
        assert!(header_map(&headers).is_err());
    }

    #[tokio::test]
    async fn test_connect_failure_is_error() {
        let config = TransportConfig::bearer("http://127.0.0.1:1/mcp", "tok");
        assert!(RmcpConnector::new().connect(config).await.is_err());
    }
}
