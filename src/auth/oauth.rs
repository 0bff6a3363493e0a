//! OAuth 2.0 client-credentials client with token caching

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::token::TokenCache;
use super::{AuthError, TokenSource};

/// Timeout applied to every token request
pub const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Client id, secret and token endpoint; fixed for the process lifetime
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub endpoint: String,
}

impl OAuthCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoint: endpoint.into(),
        }
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    DEFAULT_EXPIRES_IN_SECS
}

/// OAuth 2.0 client for the platform token endpoint
///
/// Tokens are cached and reused until five minutes before they expire. The
/// check-and-refresh sequence holds the cache lock, so concurrent callers
/// wait for a single in-flight refresh instead of starting their own.
pub struct OAuth2Client {
    credentials: OAuthCredentials,
    http: Client,
    cache: Mutex<TokenCache>,
}

impl std::fmt::Debug for OAuth2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Client")
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl OAuth2Client {
    /// Create a client for the given credentials
    pub fn new(credentials: OAuthCredentials) -> Result<Self, AuthError> {
        let http = Client::builder().timeout(TOKEN_REQUEST_TIMEOUT).build()?;

        Ok(Self {
            credentials,
            http,
            cache: Mutex::new(TokenCache::new()),
        })
    }

    /// Get a valid access token, refreshing it if necessary
    pub async fn get_access_token(&self) -> Result<String, AuthError> {
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.valid_token(Utc::now()) {
            tracing::debug!("[OAuth2Client] Reusing cached token");
            return Ok(token.to_string());
        }

        let stored = match self.request_token().await {
            Ok(response) => cache.store(response.access_token, response.expires_in, Utc::now()),
            Err(e) => Err(e),
        };
        let stored = match stored {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!("[OAuth2Client] Failed to get OAuth token: {}", e);
                return Err(e);
            }
        };
        tracing::info!(
            "[OAuth2Client] OAuth token retrieved successfully (refresh at {})",
            stored.expires_at
        );

        Ok(stored.access_token.clone())
    }

    /// Perform the client-credentials exchange
    async fn request_token(&self) -> Result<TokenResponse, AuthError> {
        tracing::debug!(
            "[OAuth2Client] Requesting token from {} for client '{}'",
            self.credentials.endpoint,
            self.credentials.client_id
        );

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.credentials.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TokenSource for OAuth2Client {
    async fn access_token(&self) -> Result<String, AuthError> {
        self.get_access_token().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHttpServer;
    use chrono::Duration as ChronoDuration;

    fn client_for(server: &MockHttpServer) -> OAuth2Client {
        OAuth2Client::new(OAuthCredentials::new(
            "test_client",
            "test_secret",
            format!("{}/oauth/token", server.url),
        ))
        .unwrap()
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = OAuthCredentials::new("id", "secret-value", "https://auth.example.com/token");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("id"));
        assert!(!debug.contains("secret-value"));
    }

    #[tokio::test]
    async fn test_fetches_and_caches_token() {
        let server = MockHttpServer::start(vec![(
            200,
            r#"{"access_token":"tok-1","expires_in":3600}"#.to_string(),
        )])
        .await;
        let client = client_for(&server);

        let before = Utc::now();
        assert_eq!(client.get_access_token().await.unwrap(), "tok-1");
        let after = Utc::now();
        assert_eq!(client.get_access_token().await.unwrap(), "tok-1");
        assert_eq!(server.hits(), 1);

        let cached = client.cache.lock().await.current().cloned().unwrap();
        assert!(cached.expires_at >= before + ChronoDuration::seconds(3300));
        assert!(cached.expires_at <= after + ChronoDuration::seconds(3300));

        let request = &server.requests()[0];
        assert!(request.head.starts_with("POST /oauth/token"));
        assert!(request
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.body.contains("grant_type=client_credentials"));
        assert!(request.body.contains("client_id=test_client"));
        assert!(request.body.contains("client_secret=test_secret"));
    }

    #[tokio::test]
    async fn test_valid_cached_token_skips_network() {
        let server = MockHttpServer::start(vec![(200, r#"{"access_token":"fresh"}"#.into())]).await;
        let client = client_for(&server);
        client.cache.lock().await.store("cached", 3600, Utc::now()).unwrap();

        assert_eq!(client.get_access_token().await.unwrap(), "cached");
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn test_stale_token_is_refreshed() {
        let server = MockHttpServer::start(vec![(200, r#"{"access_token":"fresh"}"#.into())]).await;
        let client = client_for(&server);
        // deadline is exactly now, so the token must not be reused
        client.cache.lock().await.store("stale", 300, Utc::now()).unwrap();

        assert_eq!(client.get_access_token().await.unwrap(), "fresh");
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_missing_expires_in_defaults_to_an_hour() {
        let server = MockHttpServer::start(vec![(200, r#"{"access_token":"tok"}"#.into())]).await;
        let client = client_for(&server);

        let before = Utc::now();
        client.get_access_token().await.unwrap();

        let cached = client.cache.lock().await.current().cloned().unwrap();
        assert!(cached.expires_at >= before + ChronoDuration::seconds(3300));
    }

    #[tokio::test]
    async fn test_error_status_is_authentication_error() {
        let server = MockHttpServer::start(vec![(
            401,
            r#"{"error":"invalid_client"}"#.into(),
        )])
        .await;
        let client = client_for(&server);

        let err = client.get_access_token().await.unwrap_err();
        match err {
            AuthError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("invalid_client"));
            }
            other => panic!("Expected status error, got {:?}", other),
        }
        assert!(client.cache.lock().await.current().is_none());
    }

    #[tokio::test]
    async fn test_missing_access_token_is_malformed() {
        let server = MockHttpServer::start(vec![(200, r#"{"expires_in":3600}"#.into())]).await;
        let client = client_for(&server);

        let err = client.get_access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
        assert!(client.cache.lock().await.current().is_none());
    }

    #[tokio::test]
    async fn test_huge_expires_in_is_an_error() {
        let server = MockHttpServer::start(vec![(
            200,
            r#"{"access_token":"t","expires_in":10000000000000}"#.into(),
        )])
        .await;
        let client = client_for(&server);

        let err = client.get_access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidExpiry(10_000_000_000_000)));
        assert!(client.cache.lock().await.current().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let server = MockHttpServer::start(vec![
            (200, r#"{"access_token":"tok-1","expires_in":3600}"#.into()),
            (200, r#"{"access_token":"tok-2","expires_in":3600}"#.into()),
        ])
        .await;
        let client = client_for(&server);

        let (a, b, c, d) = tokio::join!(
            client.get_access_token(),
            client.get_access_token(),
            client.get_access_token(),
            client.access_token(),
        );

        for token in [a, b, c, d] {
            assert_eq!(token.unwrap(), "tok-1");
        }
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let server = MockHttpServer::start(vec![(500, "boom".into())]).await;
        let client = client_for(&server);

        assert!(client.get_access_token().await.is_err());
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        let client = OAuth2Client::new(OAuthCredentials::new(
            "id",
            "secret",
            "http://127.0.0.1:1/oauth/token",
        ))
        .unwrap();

        let err = client.access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::Request(_)));
    }
}
