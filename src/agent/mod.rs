pub mod config;
pub mod factory;
pub mod standard_loop;

pub use config::{AgentConfig, DEFAULT_MAX_TOOL_ITERATIONS};
pub use factory::{Agent, AgentFactory, AgentSpec, StandardAgentFactory};
pub use standard_loop::StandardAgent;
