//! Bearer token cache

use chrono::{DateTime, Duration, Utc};

use super::AuthError;

/// Seconds subtracted from `expires_in` so tokens are refreshed early
pub const REFRESH_BUFFER_SECS: i64 = 300;

/// A bearer token and the instant after which it must be refreshed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    /// Refresh deadline: receipt time + `expires_in` - 300s
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Holds at most one token; replaced in place on every refresh
#[derive(Debug, Default)]
pub struct TokenCache {
    current: Option<CachedToken>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached token, if one exists and is still valid at `now`
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .map(|token| token.access_token.as_str())
    }

    /// Store a freshly issued token received at `now`
    ///
    /// An `expires_in` whose deadline cannot be represented is rejected and
    /// leaves the cache untouched.
    pub fn store(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<&CachedToken, AuthError> {
        let expires_at = expires_in_secs
            .checked_sub(REFRESH_BUFFER_SECS)
            .and_then(Duration::try_seconds)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or(AuthError::InvalidExpiry(expires_in_secs))?;

        Ok(self.current.insert(CachedToken {
            access_token: access_token.into(),
            expires_at,
        }))
    }

    pub fn current(&self) -> Option<&CachedToken> {
        self.current.as_ref()
    }
}
