//! Auth types

use chrono::{DateTime, Duration, TimeDelta, Utc};
use serde::Deserialize;
use std::fmt;

/// Seconds before expiry at which a token is treated as stale
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// OAuth2 client credentials
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
}

impl ClientCredentials {
    /// Create credentials
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Cached token with expiration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    /// Authorization header value, `"<token_type> <access_token>"`
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Whether the token must be refreshed at `now`
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) expires_in: Option<i64>,
    #[serde(default)]
    pub(crate) token_type: Option<String>,
}

impl TokenResponse {
    pub(crate) fn into_cached_token(self, issued_at: DateTime<Utc>) -> CachedToken {
        let token_type = self.token_type.as_deref().unwrap_or("Bearer");
        CachedToken {
            token: format!("{token_type} {}", self.access_token),
            // A lifetime past the representable range never expires
            expires_at: self
                .expires_in
                .and_then(TimeDelta::try_seconds)
                .and_then(|lifetime| issued_at.checked_add_signed(lifetime)),
        }
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_cached_token_refresh_margin() {
        let token = CachedToken::new("Bearer t", Some(at(300)));
        assert!(!token.is_stale_at(at(0)));
        assert!(!token.is_stale_at(at(239)));
        assert!(token.is_stale_at(at(240)));
        assert!(token.is_stale_at(at(400)));
    }

    #[test]
    fn test_cached_token_no_expiration() {
        let token = CachedToken::new("Bearer t", None);
        assert!(!token.is_stale_at(at(1_000_000)));
    }

    #[test]
    fn test_token_response_bearer_string() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token": "abc", "token_type": "BEARER", "expires_in": 900}"#,
        )
        .unwrap();
        let token = response.into_cached_token(at(0));
        assert_eq!(token.token, "BEARER abc");
        assert_eq!(token.expires_at, Some(at(900)));

        let response: TokenResponse = serde_json::from_str(r#"{"access_token": "xyz"}"#).unwrap();
        assert_eq!(response.into_cached_token(at(0)).token, "Bearer xyz");
    }

    #[test]
    fn test_token_response_huge_lifetime_never_expires() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "a", "expires_in": 9223372036854775807}"#)
                .unwrap();
        let token = response.into_cached_token(at(0));
        assert_eq!(token.expires_at, None);
        assert!(!token.is_stale_at(at(1_000_000)));

        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "a", "expires_in": 9000000000000000}"#)
                .unwrap();
        assert_eq!(response.into_cached_token(at(0)).expires_at, None);
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = ClientCredentials::new("id", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("id"));
        assert!(!debug.contains("hunter2"));
    }
}
