//! Tests for the auth module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().max_retries(0).no_rate_limit().build())
        .unwrap()
}

fn session(server: &MockServer) -> AuthSession {
    AuthSession::new(
        format!("{}/oauth2/token", server.uri()),
        ClientCredentials::new("my-client", "my-secret"),
        http(),
    )
}

#[tokio::test]
async fn test_client_credentials_grant() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("client_secret=my-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "oauth-token-123",
            "expires_in": 300,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut auth = session(&mock_server);
    assert!(auth.cached_token().is_none());

    let bearer = auth.bearer_token().await.unwrap();
    assert_eq!(bearer, "Bearer oauth-token-123");
    assert!(auth.cached_token().unwrap().expires_at.is_some());
}

#[tokio::test]
async fn test_token_is_cached_until_margin() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "cached-token",
            "expires_in": 300,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut auth = session(&mock_server);
    let now = Utc::now();

    let first = auth.bearer_token_at(now).await.unwrap();
    let second = auth.bearer_token_at(now + Duration::seconds(200)).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_stale_token_is_refreshed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 300,
            "token_type": "Bearer"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut auth = session(&mock_server);
    let now = Utc::now();

    auth.bearer_token_at(now).await.unwrap();
    // Within 60 seconds of the 300 second expiry
    auth.bearer_token_at(now + Duration::seconds(250)).await.unwrap();
}

#[tokio::test]
async fn test_token_request_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&mock_server)
        .await;

    let mut auth = session(&mock_server);
    let err = auth.bearer_token().await.unwrap_err();
    assert!(matches!(err, Error::OAuth2 { ref message } if message.contains("invalid_client")));
    assert!(auth.cached_token().is_none());
}

#[tokio::test]
async fn test_malformed_token_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let mut auth = session(&mock_server);
    assert!(matches!(
        auth.bearer_token().await,
        Err(Error::OAuth2 { .. })
    ));
}
