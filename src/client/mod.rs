//! Reltio agent client
//!
//! - `ConnectionBootstrapper`: token, transport and tool discovery
//! - `ReltioAgentClient`: agent construction and prompt dispatch
//! - `HealthReport`: result of the remote health probe

pub mod bootstrap;
#[allow(clippy::module_inception)]
mod client;
pub mod health;

pub use bootstrap::ConnectionBootstrapper;
pub use client::ReltioAgentClient;
pub use health::{HealthReport, HealthStatus, HEALTH_CHECK_TOOL};
