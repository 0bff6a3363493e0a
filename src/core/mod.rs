//! Core types shared across the client
//!
//! - `ClientConfig` - Environment-driven configuration
//! - `ClientError` - Error types
//! - System prompt loading and tenant injection

pub mod config;
pub mod error;
pub mod prompt;

pub use config::{load_dotenv_from, mcp_endpoint_for, ClientConfig, DOTENV_FILE, OAUTH_ENDPOINT};
pub use error::{ClientError, ClientResult};
pub use prompt::{
    compose_system_prompt, load_system_prompt, load_system_prompt_from, DEFAULT_SYSTEM_PROMPT,
};
