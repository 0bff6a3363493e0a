//! Tools exposed to the agent loop
//!
//! Every remote MCP tool is wrapped as a [`Tool`] and collected in a
//! [`ToolRegistry`] that the agent dispatches through.

mod registry;
mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolResult};
