//! OAuth2 session for the Criteo Marketing API
//!
//! The session owns the current token and refreshes it when it is within
//! the refresh margin of expiry.

use super::types::{CachedToken, ClientCredentials, TokenResponse};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Client-credentials session holding the current bearer token
#[derive(Debug)]
pub struct AuthSession {
    token_url: String,
    credentials: ClientCredentials,
    http: HttpClient,
    cached: Option<CachedToken>,
}

impl AuthSession {
    /// Create a session; no token is requested until one is needed
    pub fn new(token_url: impl Into<String>, credentials: ClientCredentials, http: HttpClient) -> Self {
        Self {
            token_url: token_url.into(),
            credentials,
            http,
            cached: None,
        }
    }

    /// Currently cached token, if any
    pub fn cached_token(&self) -> Option<&CachedToken> {
        self.cached.as_ref()
    }

    /// Bearer header value valid now
    pub async fn bearer_token(&mut self) -> Result<String> {
        self.bearer_token_at(Utc::now()).await
    }

    /// Bearer header value valid at `now`, refreshing a stale token first
    pub async fn bearer_token_at(&mut self, now: DateTime<Utc>) -> Result<String> {
        if let Some(token) = self.cached.as_ref() {
            if !token.is_stale_at(now) {
                return Ok(token.token.clone());
            }
            debug!(expires_at = ?token.expires_at, "Access token is stale, refreshing");
        }

        let token = self.fetch_token(now).await?;
        let bearer = token.token.clone();
        self.cached = Some(token);
        Ok(bearer)
    }

    /// Request a new token with the client credentials grant
    async fn fetch_token(&self, issued_at: DateTime<Utc>) -> Result<CachedToken> {
        info!("Getting OAuth token");

        let request = RequestConfig::new().form([
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ]);

        let body = self
            .http
            .post_text(&self.token_url, request)
            .await
            .map_err(|e| match e {
                Error::HttpStatus { status, body } => Error::OAuth2 {
                    message: format!("Token request failed with status {status}: {body}"),
                },
                other => other,
            })?;

        let response: TokenResponse = serde_json::from_str(&body).map_err(|e| Error::OAuth2 {
            message: format!("Invalid token response: {e}"),
        })?;
        Ok(response.into_cached_token(issued_at))
    }
}
