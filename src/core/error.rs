//! Client error types

use thiserror::Error;

use crate::auth::AuthError;

/// Errors surfaced by the client bootstrap and configuration layer
#[derive(Error, Debug)]
pub enum ClientError {
    /// OAuth token retrieval failed
    #[error("OAuth token retrieval failed: {0}")]
    Authentication(#[from] AuthError),

    /// Missing or invalid configuration, or a failed bootstrap step
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Dispatch attempted before the connection or agent exists
    #[error("Client not connected: {0}")]
    NotConnected(String),
}

impl ClientError {
    /// Create a configuration error without an underlying cause
    pub fn config(message: impl Into<String>) -> Self {
        ClientError::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error wrapping the error that caused it
    pub fn config_with(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        let source = source.into();
        ClientError::Configuration {
            message: format!("{}: {}", message.into(), source),
            source: Some(source),
        }
    }

    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, ClientError::Configuration { .. })
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
