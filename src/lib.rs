pub mod auth;
pub mod core;
pub mod llm;
pub mod mcp;
pub mod tools;

// Agent construction and the default tool-use loop
pub mod agent;

// Bootstrap, dispatch and health check
pub mod client;

// Binary support
pub mod cli;
pub mod logging;

#[cfg(test)]
mod testing;

pub use client::{HealthReport, HealthStatus, ReltioAgentClient};
pub use self::core::{ClientConfig, ClientError, ClientResult};
