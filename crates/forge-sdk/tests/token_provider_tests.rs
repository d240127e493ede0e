//! Tests for the caching client-credentials token provider.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forge_sdk::auth::{AuthenticationClient, Clock, OAuthTokenProvider, TokenProvider};
use forge_sdk::config::Config;
use forge_sdk::error::ForgeError;

/// Clock that only moves when told to.
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Utc::now())))
    }

    fn advance(&self, seconds: i64) {
        let mut now = self.0.lock().unwrap();
        *now += TimeDelta::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn token_body(access_token: &str, expires_in: u64) -> serde_json::Value {
    json!({
        "token_type": "Bearer",
        "access_token": access_token,
        "expires_in": expires_in
    })
}

fn setup_provider(mock_server: &MockServer, clock: Arc<ManualClock>) -> OAuthTokenProvider {
    let config = Config::for_testing(&mock_server.uri());
    let auth = AuthenticationClient::new(&config).unwrap();
    OAuthTokenProvider::with_authentication_client("test-client", "test-secret", auth)
        .with_clock(clock)
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_repeated_requests_share_one_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = setup_provider(&mock_server, ManualClock::new());

    let first = provider.get_token(&["data:read"]).await.unwrap();
    let second = provider.get_token(&["data:read"]).await.unwrap();

    assert_eq!(first, "tok-1");
    assert_eq!(second, "tok-1");
    assert_eq!(provider.cached_entries().await, 1);
}

#[tokio::test]
async fn test_scope_order_produces_distinct_entries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .and(body_string_contains("scope=a+b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-ab", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .and(body_string_contains("scope=b+a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-ba", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = setup_provider(&mock_server, ManualClock::new());

    assert_eq!(provider.get_token(&["a", "b"]).await.unwrap(), "tok-ab");
    assert_eq!(provider.get_token(&["b", "a"]).await.unwrap(), "tok-ba");
    assert_eq!(provider.get_token(&["a", "b"]).await.unwrap(), "tok-ab");
    assert_eq!(provider.cached_entries().await, 2);
}

#[tokio::test]
async fn test_concurrent_misses_share_one_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("tok-shared", 3600))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = Arc::new(setup_provider(&mock_server, ManualClock::new()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.get_token(&["data:read"]).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "tok-shared");
    }
}

// =============================================================================
// Expiry
// =============================================================================

#[tokio::test]
async fn test_expired_token_is_replaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-old", 60)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-new", 60)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let clock = ManualClock::new();
    let provider = setup_provider(&mock_server, Arc::clone(&clock));

    assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "tok-old");

    clock.advance(59);
    assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "tok-old");

    clock.advance(1);
    assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "tok-new");
    assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "tok-new");
    assert_eq!(provider.cached_entries().await, 1);
}

#[tokio::test]
async fn test_failed_refresh_never_returns_stale_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-old", 60)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let clock = ManualClock::new();
    let provider = setup_provider(&mock_server, Arc::clone(&clock));

    assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "tok-old");

    clock.advance(120);
    let err = provider.get_token(&["data:read"]).await.unwrap_err();
    assert!(err.is_authentication());
    assert_eq!(err.status(), Some(503));

    // Still failing, still no stale token.
    assert!(provider.get_token(&["data:read"]).await.is_err());
    assert_eq!(provider.cached_entries().await, 0);
}

#[tokio::test]
async fn test_zero_lifetime_token_is_never_reused() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authentication/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-instant", 0)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let provider = setup_provider(&mock_server, ManualClock::new());

    assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "tok-instant");
    assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "tok-instant");
}

// =============================================================================
// Error Classification
// =============================================================================

#[tokio::test]
async fn test_unreachable_endpoint_is_authentication_error_for_every_waiter() {
    let auth = AuthenticationClient::with_base_url("http://127.0.0.1:1/authentication/v1/").unwrap();
    let provider = Arc::new(
        OAuthTokenProvider::with_authentication_client("test-client", "test-secret", auth)
            .with_clock(ManualClock::new()),
    );

    let alone = provider.get_token(&["data:read"]).await.unwrap_err();
    assert!(matches!(alone, ForgeError::Authentication { status: None, .. }));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.get_token(&["data:read"]).await })
        })
        .collect();

    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, ForgeError::Authentication { status: None, .. }), "{err:?}");
        assert!(err.to_string().contains("token exchange failed"));
    }
    assert_eq!(provider.cached_entries().await, 0);
}
