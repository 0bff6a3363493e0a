//! Client configuration
//!
//! Everything the client needs is read once from the process environment
//! into a [`ClientConfig`], which is then passed explicitly to
//! [`ReltioAgentClient::connect`](crate::client::ReltioAgentClient::connect).
//!
//! | Variable | Default |
//! |---|---|
//! | `OAUTH_CLIENT_ID` / `OAUTH_CLIENT_SECRET` | empty |
//! | `TENANT_ENVIRONMENT` | `dev` |
//! | `RELTIO_TENANT_ID` | empty |
//! | `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` | empty |
//! | `MODEL_TEMPERATURE` | `0.7` |
//! | `MODEL_MAX_TOKENS` | `4096` |
//! | `MODEL_ID` | provider default |

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::auth::OAuthCredentials;
use crate::llm::{select_provider, ModelProvider, ModelSettings};

use super::error::{ClientError, ClientResult};
use super::prompt::SYSTEM_PROMPT_FILE;

/// Optional `KEY=value` file read by the binary before [`ClientConfig::from_env`]
pub const DOTENV_FILE: &str = ".env";

/// OAuth token endpoint, fixed for all tenants
pub const OAUTH_ENDPOINT: &str = "https://auth.reltio.com/oauth/token";

const DEFAULT_TENANT_ENVIRONMENT: &str = "dev";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Build the MCP endpoint URL for a tenant environment
pub fn mcp_endpoint_for(environment: &str) -> String {
    format!("https://{}.reltio.com/ai/tools/mcp/", environment)
}

/// Validated client configuration
#[derive(Clone)]
pub struct ClientConfig {
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    pub oauth_endpoint: String,

    /// Tenant environment name (e.g. "dev", "test", "361")
    pub tenant_environment: String,
    /// MCP endpoint derived from the tenant environment
    pub mcp_endpoint: String,
    /// Tenant every remote tool call is scoped to
    pub tenant_id: String,

    pub openai_api_key: String,
    pub anthropic_api_key: String,

    pub model_temperature: f32,
    pub model_max_tokens: u32,
    /// Model id, either from `MODEL_ID` or the selected provider's default
    pub model_id: String,

    /// Where the base system prompt is read from
    pub system_prompt_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> ClientResult<Self> {
        tracing::debug!("[ClientConfig] Loading configuration from environment");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let tenant_environment = var("TENANT_ENVIRONMENT", DEFAULT_TENANT_ENVIRONMENT);
        let openai_api_key = var("OPENAI_API_KEY", "");
        let anthropic_api_key = var("ANTHROPIC_API_KEY", "");

        let model_temperature: f32 =
            parse_var(&lookup, "MODEL_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&model_temperature) {
            return Err(ClientError::config(format!(
                "MODEL_TEMPERATURE must be between 0 and 2, got {}",
                model_temperature
            )));
        }

        let model_max_tokens: u32 = parse_var(&lookup, "MODEL_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if model_max_tokens == 0 {
            return Err(ClientError::config("MODEL_MAX_TOKENS must be positive"));
        }

        let provider = select_provider(&openai_api_key, &anthropic_api_key);
        let model_id = lookup("MODEL_ID")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| provider.default_model_id().to_string());

        Ok(Self {
            oauth_client_id: var("OAUTH_CLIENT_ID", ""),
            oauth_client_secret: var("OAUTH_CLIENT_SECRET", ""),
            oauth_endpoint: OAUTH_ENDPOINT.to_string(),
            mcp_endpoint: mcp_endpoint_for(&tenant_environment),
            tenant_environment,
            tenant_id: var("RELTIO_TENANT_ID", ""),
            openai_api_key,
            anthropic_api_key,
            model_temperature,
            model_max_tokens,
            model_id,
            system_prompt_file: PathBuf::from(SYSTEM_PROMPT_FILE),
        })
    }

    /// Read the base system prompt from `path` instead of `system_prompt.txt`
    pub fn with_system_prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_prompt_file = path.into();
        self
    }

    /// Check that the fields required to bootstrap a client are present
    pub fn validate(&self) -> ClientResult<()> {
        if self.mcp_endpoint.is_empty() || self.tenant_id.is_empty() {
            return Err(ClientError::config("Missing required MCP configuration"));
        }
        if self.oauth_client_id.is_empty() || self.oauth_client_secret.is_empty() {
            return Err(ClientError::config("Missing required OAuth configuration"));
        }
        Ok(())
    }

    /// Provider picked from the available API keys
    pub fn preferred_model_provider(&self) -> ModelProvider {
        select_provider(&self.openai_api_key, &self.anthropic_api_key)
    }

    /// Model settings for the preferred provider
    pub fn model_settings(&self) -> ModelSettings {
        let provider = self.preferred_model_provider();
        let api_key = match provider {
            ModelProvider::OpenAi => self.openai_api_key.clone(),
            ModelProvider::Anthropic => self.anthropic_api_key.clone(),
        };

        ModelSettings {
            provider,
            model_id: self.model_id.clone(),
            temperature: self.model_temperature,
            max_tokens: self.model_max_tokens,
            api_key,
        }
    }

    /// OAuth credentials for the token endpoint
    pub fn oauth_credentials(&self) -> OAuthCredentials {
        OAuthCredentials::new(
            &self.oauth_client_id,
            &self.oauth_client_secret,
            &self.oauth_endpoint,
        )
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("oauth_client_id", &self.oauth_client_id)
            .field("oauth_endpoint", &self.oauth_endpoint)
            .field("tenant_environment", &self.tenant_environment)
            .field("mcp_endpoint", &self.mcp_endpoint)
            .field("tenant_id", &self.tenant_id)
            .field("has_openai_key", &!self.openai_api_key.is_empty())
            .field("has_anthropic_key", &!self.anthropic_api_key.is_empty())
            .field("model_temperature", &self.model_temperature)
            .field("model_max_tokens", &self.model_max_tokens)
            .field("model_id", &self.model_id)
            .field("system_prompt_file", &self.system_prompt_file)
            .finish()
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> ClientResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            ClientError::config(format!("Invalid value for {}: '{}' ({})", key, raw, e))
        }),
        _ => Ok(default),
    }
}

/// Load variables from a `.env` style file into the process environment
///
/// Variables that are already set keep their value. Returns `false` when the
/// file does not exist.
pub fn load_dotenv_from(path: impl AsRef<Path>) -> ClientResult<bool> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ClientError::config_with(
            format!("Failed to load {}", path.display()),
            e,
        )),
    }
}
