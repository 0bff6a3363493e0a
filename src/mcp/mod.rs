//! MCP (Model Context Protocol) Support
//!
//! Connects to the remote tool server and exposes its tools to the agent.
//!
//! # Architecture
//!
//! - `ToolTransport` / `TransportConnector`: seam between the client and the wire
//! - `McpConnection` / `RmcpConnector`: rmcp streamable-HTTP implementation
//! - `McpToolAdapter`: adapts remote tools to implement the Tool trait

mod config;
mod server;
mod tool_adapter;
mod transport;

pub use config::TransportConfig;
pub use server::{HttpClientTransport, McpConnection, RmcpConnector};
pub use tool_adapter::McpToolAdapter;
pub use transport::{ToolCallOutput, ToolContent, ToolDescriptor, ToolTransport, TransportConnector};
