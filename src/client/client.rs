//! Reltio agent client
//!
//! Ties the pieces together in a fixed order: bootstrap the tool connection,
//! build the tenant-bound agent, then dispatch prompts to it.

use std::sync::Arc;

use anyhow::Result;

use super::bootstrap::ConnectionBootstrapper;
use super::health::{self, HealthReport};
use crate::agent::{Agent, AgentFactory, AgentSpec, StandardAgentFactory};
use crate::auth::{OAuth2Client, TokenSource};
use crate::core::{
    compose_system_prompt, load_system_prompt_from, ClientConfig, ClientError, ClientResult,
};
use crate::mcp::{RmcpConnector, ToolDescriptor, TransportConnector};

/// Client bound to one tenant and one remote tool server
pub struct ReltioAgentClient {
    config: ClientConfig,
    bootstrapper: ConnectionBootstrapper,
    agent_factory: Arc<dyn AgentFactory>,
    agent: Option<Box<dyn Agent>>,
}

impl ReltioAgentClient {
    /// Create an unconnected client
    ///
    /// Most callers want [`connect`](Self::connect); this is for driving
    /// [`start_connection`](Self::start_connection) and
    /// [`create_agent`](Self::create_agent) by hand.
    pub fn new(
        config: ClientConfig,
        token_source: Arc<dyn TokenSource>,
        connector: Arc<dyn TransportConnector>,
        agent_factory: Arc<dyn AgentFactory>,
    ) -> Self {
        let bootstrapper =
            ConnectionBootstrapper::new(config.mcp_endpoint.clone(), token_source, connector);
        Self {
            config,
            bootstrapper,
            agent_factory,
            agent: None,
        }
    }

    /// Build a fully initialized client: connected, tools discovered, agent ready
    ///
    /// Either everything succeeds or a `Configuration` error starting with
    /// "Initialization failed" is returned.
    pub async fn connect(
        config: ClientConfig,
        token_source: Arc<dyn TokenSource>,
        connector: Arc<dyn TransportConnector>,
        agent_factory: Arc<dyn AgentFactory>,
    ) -> ClientResult<Self> {
        config.validate().map_err(initialization_failed)?;

        let mut client = Self::new(config, token_source, connector, agent_factory);
        client
            .start_connection()
            .await
            .map_err(initialization_failed)?;
        client.create_agent(None).map_err(initialization_failed)?;

        tracing::info!(
            "[ReltioAgentClient] Initialized for tenant {} with {} tools",
            client.config.tenant_id,
            client.tool_names().len()
        );
        Ok(client)
    }

    /// Connect with the production stack: OAuth2, rmcp and the standard agent
    pub async fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let token_source = OAuth2Client::new(config.oauth_credentials())
            .map_err(|e| initialization_failed(e.into()))?;

        Self::connect(
            config,
            Arc::new(token_source),
            Arc::new(RmcpConnector::new()),
            Arc::new(StandardAgentFactory::new()),
        )
        .await
    }

    /// Open the tool connection and discover tools (idempotent)
    pub async fn start_connection(&mut self) -> ClientResult<Arc<Vec<ToolDescriptor>>> {
        self.bootstrapper.start_connection().await
    }

    /// Build the agent, replacing any previous one
    ///
    /// `system_prompt` overrides the prompt file; the tenant clause is always
    /// appended.
    pub fn create_agent(&mut self, system_prompt: Option<&str>) -> ClientResult<()> {
        let (Some(tools), Some(transport)) =
            (self.bootstrapper.tools(), self.bootstrapper.transport())
        else {
            return Err(ClientError::NotConnected(
                "start_connection must succeed before create_agent".to_string(),
            ));
        };

        let base = match system_prompt {
            Some(prompt) => prompt.to_string(),
            None => load_system_prompt_from(&self.config.system_prompt_file),
        };
        let model = self.config.model_settings();

        tracing::info!(
            "[ReltioAgentClient] Creating agent with {} model {}",
            model.provider,
            model.model_id
        );

        let agent = self
            .agent_factory
            .create(AgentSpec {
                system_prompt: compose_system_prompt(&base, &self.config.tenant_id),
                tools,
                model,
                transport,
            })
            .map_err(|e| ClientError::config_with("Failed to create agent", e))?;

        self.agent = Some(agent);
        Ok(())
    }

    /// Forward a prompt to the agent
    ///
    /// Agent errors are logged and returned unchanged.
    pub async fn process_prompt(&self, prompt: &str) -> Result<String> {
        let agent = self.agent.as_ref().ok_or_else(|| {
            ClientError::NotConnected("no agent has been created".to_string())
        })?;

        tracing::debug!("[ReltioAgentClient] Processing prompt ({} chars)", prompt.len());

        agent.run(prompt).await.map_err(|e| {
            tracing::error!("[ReltioAgentClient] Error processing prompt: {:#}", e);
            e
        })
    }

    /// Probe the server's health tool; never fails
    pub async fn health_check(&self) -> HealthReport {
        match self.bootstrapper.transport() {
            Some(transport) => health::probe(transport.as_ref()).await,
            None => {
                tracing::warn!("[ReltioAgentClient] Health check before connection started");
                HealthReport::unhealthy()
            }
        }
    }

    pub fn tool_names(&self) -> &[String] {
        self.bootstrapper.tool_names()
    }

    pub fn tenant_id(&self) -> &str {
        &self.config.tenant_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_agent(&self) -> bool {
        self.agent.is_some()
    }
}

fn initialization_failed(err: ClientError) -> ClientError {
    let message = match &err {
        ClientError::Configuration { message, .. } => format!("Initialization failed: {}", message),
        other => format!("Initialization failed: {}", other),
    };
    tracing::error!("[ReltioAgentClient] {}", message);
    ClientError::Configuration {
        message,
        source: Some(err.into()),
    }
}
