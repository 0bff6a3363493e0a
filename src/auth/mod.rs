//! OAuth 2.0 client-credentials authentication
//!
//! The MCP endpoint accepts a bearer token minted by the platform's token
//! endpoint. [`OAuth2Client`] fetches that token with the client-credentials
//! grant and caches it until five minutes before it expires.
//!
//! ```ignore
//! use reltio_mcp_agent::auth::{OAuth2Client, OAuthCredentials, TokenSource};
//!
//! let client = OAuth2Client::new(OAuthCredentials::new(
//!     "client-id",
//!     "client-secret",
//!     "https://auth.reltio.com/oauth/token",
//! ))?;
//! let token = client.access_token().await?;
//! ```

mod oauth;
pub mod token;

use async_trait::async_trait;
use thiserror::Error;

pub use oauth::{OAuth2Client, OAuthCredentials, TOKEN_REQUEST_TIMEOUT};
pub use token::{CachedToken, TokenCache, REFRESH_BUFFER_SECS};

/// Errors from the token endpoint exchange
#[derive(Error, Debug)]
pub enum AuthError {
    /// Network failure, timeout, or client construction error
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Token endpoint answered with a non-success status
    #[error("token endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body was not a valid token response
    #[error("malformed token response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// `expires_in` too large or too small to compute a deadline from
    #[error("token response has unusable expires_in: {0}")]
    InvalidExpiry(i64),
}

/// Source of bearer tokens for the MCP transport
///
/// Implemented by [`OAuth2Client`]; tests substitute a fixed token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a currently valid bearer token
    async fn access_token(&self) -> Result<String, AuthError>;
}
