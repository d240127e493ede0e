//! Tests for the OAuth token exchanges against a mock authentication API.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forge_sdk::auth::AuthenticationClient;
use forge_sdk::config::Config;
use forge_sdk::error::ForgeError;

fn setup_client(mock_server: &MockServer) -> AuthenticationClient {
    let config = Config::for_testing(&mock_server.uri());
    AuthenticationClient::new(&config).unwrap()
}

// =============================================================================
// Client Credentials
// =============================================================================

#[tokio::test]
async fn test_authenticate_sends_form_and_parses_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("client_id=my-id"))
        .and(body_string_contains("client_secret=my-secret"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("scope=data%3Aread+bucket%3Aread"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "abc123",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let token = client
        .authenticate("my-id", "my-secret", &["data:read", "bucket:read"])
        .await
        .expect("authentication should succeed");

    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.access_token, "abc123");
    assert_eq!(token.expires_in, 3599);
}

#[tokio::test]
async fn test_authenticate_rejected_is_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid client"))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server)
        .authenticate("id", "wrong", &["data:read"])
        .await
        .unwrap_err();

    assert!(err.is_authentication());
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid client"));
}

#[tokio::test]
async fn test_authenticate_malformed_body_is_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "x"})))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server)
        .authenticate("id", "secret", &["data:read"])
        .await
        .unwrap_err();

    assert!(matches!(err, ForgeError::Authentication { status: None, .. }));
}

#[tokio::test]
async fn test_authenticate_negative_lifetime_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "x",
            "expires_in": -5
        })))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server)
        .authenticate("id", "secret", &["data:read"])
        .await
        .unwrap_err();

    assert!(err.is_authentication());
}

#[tokio::test]
async fn test_empty_credentials_never_reach_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = client.authenticate("", "secret", &["data:read"]).await.unwrap_err();
    assert!(matches!(err, ForgeError::InvalidArgument { .. }));

    let err = client.get_token("id", "", "code", "http://cb").await.unwrap_err();
    assert!(matches!(err, ForgeError::InvalidArgument { .. }));
}

// =============================================================================
// Authorization Code & Refresh
// =============================================================================

#[tokio::test]
async fn test_get_token_exchanges_authorization_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/gettoken"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code-1"))
        .and(body_string_contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fcallback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "user-token",
            "refresh_token": "refresh-1",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = setup_client(&mock_server)
        .get_token("id", "secret", "auth-code-1", "http://localhost:3000/callback")
        .await
        .unwrap();

    assert_eq!(token.access_token, "user-token");
    assert_eq!(token.refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_refresh_token_grant() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/refreshtoken"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .and(body_string_contains("scope=data%3Aread"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "user-token-2",
            "refresh_token": "refresh-2",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = setup_client(&mock_server)
        .refresh_token("id", "secret", "refresh-1", &["data:read"])
        .await
        .unwrap();

    assert_eq!(token.access_token, "user-token-2");
    assert_eq!(token.refresh_token, "refresh-2");
}

#[tokio::test]
async fn test_refresh_token_missing_refresh_token_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/refreshtoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "user-token-2",
            "expires_in": 3599
        })))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server)
        .refresh_token("id", "secret", "refresh-1", &["data:read"])
        .await
        .unwrap_err();

    assert!(err.is_authentication());
}
