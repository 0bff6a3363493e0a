//! Connection bootstrap
//!
//! Token → authenticated transport → tool catalog, exactly once per client.

use std::sync::Arc;

use crate::auth::TokenSource;
use crate::core::{ClientError, ClientResult};
use crate::mcp::{ToolDescriptor, ToolTransport, TransportConfig, TransportConnector};

/// State held once the connection is up
struct Connection {
    transport: Arc<dyn ToolTransport>,
    tools: Arc<Vec<ToolDescriptor>>,
    tool_names: Vec<String>,
}

/// Opens the tool server connection and discovers its tools
pub struct ConnectionBootstrapper {
    endpoint: String,
    token_source: Arc<dyn TokenSource>,
    connector: Arc<dyn TransportConnector>,
    connection: Option<Connection>,
}

impl ConnectionBootstrapper {
    pub fn new(
        endpoint: impl Into<String>,
        token_source: Arc<dyn TokenSource>,
        connector: Arc<dyn TransportConnector>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            token_source,
            connector,
            connection: None,
        }
    }

    /// Connect and list tools; later calls return the stored catalog
    ///
    /// On failure nothing is stored and the next call starts over.
    pub async fn start_connection(&mut self) -> ClientResult<Arc<Vec<ToolDescriptor>>> {
        if let Some(connection) = &self.connection {
            tracing::debug!("[Bootstrap] Connection already started");
            return Ok(connection.tools.clone());
        }

        tracing::info!("[Bootstrap] Starting MCP connection to {}", self.endpoint);

        let token = self
            .token_source
            .access_token()
            .await
            .map_err(|e| {
                ClientError::config_with(
                    "Failed to start MCP connection",
                    ClientError::Authentication(e),
                )
            })?;

        let transport = self
            .connector
            .connect(TransportConfig::bearer(&self.endpoint, &token))
            .await
            .map_err(|e| ClientError::config_with("Failed to start MCP connection", e))?;

        let tools = transport
            .list_tools()
            .await
            .map_err(|e| ClientError::config_with("Failed to list MCP tools", e))?;

        let tool_names: Vec<String> = tools.iter().map(|t| t.name.clone()).collect();
        tracing::info!(
            "[Bootstrap] Discovered {} tools: {}",
            tool_names.len(),
            tool_names.join(", ")
        );

        let tools = Arc::new(tools);
        self.connection = Some(Connection {
            transport,
            tools: tools.clone(),
            tool_names,
        });

        Ok(tools)
    }

    pub fn is_started(&self) -> bool {
        self.connection.is_some()
    }

    /// Discovered tools, once started
    pub fn tools(&self) -> Option<Arc<Vec<ToolDescriptor>>> {
        self.connection.as_ref().map(|c| c.tools.clone())
    }

    /// Names of the discovered tools, empty before the connection starts
    pub fn tool_names(&self) -> &[String] {
        self.connection
            .as_ref()
            .map(|c| c.tool_names.as_slice())
            .unwrap_or(&[])
    }

    /// The live transport, once started
    pub fn transport(&self) -> Option<Arc<dyn ToolTransport>> {
        self.connection.as_ref().map(|c| c.transport.clone())
    }
}
