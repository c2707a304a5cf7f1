use crate::helpers::{
    TEST_CLIENT_ID, TEST_CLIENT_SECRET, TOKEN_PATH, config_for, expected_bearer, mount_login,
    session_for, session_with_cache, token_response,
};

use bankly_core::{LoginError, RequestContext, Session, TokenCache, TokenProvider};

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(session: &Session) -> TokenProvider {
    TokenProvider::new(session, Client::new())
}

/// **VALUE**: Verifies that two `token()` calls within the validity window hit
/// the login endpoint once.
///
/// **WHY THIS MATTERS**: Logging in per request doubles latency and gets the
/// client rate-limited by the identity provider.
///
/// **BUG THIS CATCHES**: Would catch the cache being written under one key and
/// read under another, or never written at all.
#[tokio::test]
async fn given_valid_cached_token_when_token_called_twice_then_one_login() {
    // GIVEN: A login endpoint that must be called exactly once
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    let provider = provider_for(&session_for(&server));
    let ctx = RequestContext::new();

    // WHEN: Asking for a token twice
    let first = provider.token(&ctx).await.unwrap();
    let second = provider.token(&ctx).await.unwrap();

    // THEN: Same bearer both times, one upstream call (verified on drop)
    assert_eq!(first, expected_bearer());
    assert_eq!(second, first);
}

/// **VALUE**: Verifies that a new login happens once `expires_in` has elapsed.
///
/// **BUG THIS CATCHES**: Would catch an expired token being served forever.
#[tokio::test]
async fn given_expired_token_when_token_called_then_new_login() {
    // GIVEN: Tokens that live one second
    let server = MockServer::start().await;
    mount_login(&server, Some(1), 2).await;
    let provider = provider_for(&session_for(&server));
    let ctx = RequestContext::new();

    // WHEN: Calling before and after expiry
    provider.token(&ctx).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    provider.token(&ctx).await.unwrap();

    // THEN: Two logins (verified on drop)
}

/// **VALUE**: Verifies that a zero-lifetime token is returned but never cached.
#[tokio::test]
async fn given_zero_expiry_when_token_called_twice_then_two_logins() {
    let server = MockServer::start().await;
    mount_login(&server, Some(0), 2).await;
    let provider = provider_for(&session_for(&server));
    let ctx = RequestContext::new();

    assert_eq!(provider.token(&ctx).await.unwrap(), expected_bearer());
    assert_eq!(provider.token(&ctx).await.unwrap(), expected_bearer());
}

/// **VALUE**: Verifies that a response without `expires_in` falls back to the
/// cache's default lifetime instead of not caching.
#[tokio::test]
async fn given_missing_expiry_when_token_called_twice_then_default_ttl_caches() {
    let server = MockServer::start().await;
    mount_login(&server, None, 1).await;
    let provider = provider_for(&session_for(&server));
    let ctx = RequestContext::new();

    provider.token(&ctx).await.unwrap();
    provider.token(&ctx).await.unwrap();
}

/// **VALUE**: Verifies that an out-of-range `expires_in` is accepted, capped
/// and cached rather than crashing the caller's task.
#[tokio::test]
async fn given_maximal_expiry_when_token_called_twice_then_cached_without_panic() {
    // GIVEN: A login endpoint answering expires_in = u64::MAX, called once
    let server = MockServer::start().await;
    mount_login(&server, Some(u64::MAX), 1).await;
    let provider = provider_for(&session_for(&server));
    let ctx = RequestContext::new();

    // WHEN: Asking twice
    let first = provider.token(&ctx).await.unwrap();
    let second = provider.token(&ctx).await.unwrap();

    // THEN: Same bearer, one login (verified on drop)
    assert_eq!(first, expected_bearer());
    assert_eq!(second, first);
}

/// **VALUE**: Verifies the OAuth2 client-credentials form sent to the login endpoint.
///
/// **BUG THIS CATCHES**: Would catch credentials sent as JSON or as query
/// parameters, which the identity provider rejects.
#[tokio::test]
async fn given_credentials_when_logging_in_then_form_encoded_body_sent() {
    // GIVEN: A login route that only matches the expected form
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains(format!("client_id={TEST_CLIENT_ID}")))
        .and(body_string_contains(format!("client_secret={TEST_CLIENT_SECRET}")))
        .and(body_string_contains("scope=pix.write"))
        .respond_with(token_response(Some(60)))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(config_for(&server).with_scope("pix.write")).unwrap();

    // WHEN: Logging in
    let result = provider_for(&session).token(&RequestContext::new()).await;

    // THEN: The form matched
    assert!(result.is_ok(), "login failed: {result:?}");
}

/// **VALUE**: Verifies that a camelCase token response is accepted and that
/// the upstream token type is preserved.
#[tokio::test]
async fn given_camel_case_response_when_logging_in_then_token_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "camel",
            "expiresIn": 60,
            "tokenType": "bearer",
        })))
        .mount(&server)
        .await;

    let bearer = provider_for(&session_for(&server))
        .token(&RequestContext::new())
        .await
        .unwrap();

    assert_eq!(bearer, "bearer camel");
}

/// **VALUE**: Verifies that a 400 from the login endpoint becomes
/// `LoginError::Rejected` carrying the upstream `error`.
///
/// **WHY THIS MATTERS**: Bad credentials are a configuration problem the
/// operator must see verbatim, distinct from business failures.
#[tokio::test]
async fn given_bad_credentials_when_logging_in_then_rejected_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})))
        .mount(&server)
        .await;

    let err = provider_for(&session_for(&server))
        .token(&RequestContext::new())
        .await
        .unwrap_err();

    match err {
        LoginError::Rejected { message, .. } => assert_eq!(message, "invalid_client"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

/// **VALUE**: Verifies that other statuses become `UnexpectedStatus` with the status kept.
#[tokio::test]
async fn given_server_error_when_logging_in_then_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = provider_for(&session_for(&server))
        .token(&RequestContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.status_code().map(|s| s.as_u16()), Some(503));
    assert!(matches!(err, LoginError::UnexpectedStatus { .. }));
}

/// **VALUE**: Verifies that a 200 with a body that is not a token is an invalid response.
#[tokio::test]
async fn given_garbage_success_body_when_logging_in_then_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&session_for(&server))
        .token(&RequestContext::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LoginError::InvalidResponse { .. }));
}

/// **VALUE**: Verifies that an unreachable login endpoint is a transport login error.
#[tokio::test]
async fn given_unreachable_login_endpoint_when_logging_in_then_transport_error() {
    // GIVEN: A port nothing listens on
    let session = Session::new(
        bankly_core::SessionConfig::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
            .with_login_endpoint("http://127.0.0.1:1/"),
    )
    .unwrap();

    // WHEN: Logging in
    let err = provider_for(&session)
        .token(&RequestContext::new())
        .await
        .unwrap_err();

    // THEN: Transport failure, no status
    assert!(matches!(err, LoginError::Transport { .. }));
    assert_eq!(err.status_code(), None);
}

/// **VALUE**: Verifies that an already-cancelled context never reaches the network.
#[tokio::test]
async fn given_cancelled_context_when_token_called_then_cancelled_without_login() {
    let server = MockServer::start().await;
    mount_login(&server, Some(60), 0).await;
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = provider_for(&session_for(&server))
        .token(&ctx)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}

/// **VALUE**: Verifies that cancelling mid-exchange aborts promptly.
///
/// **WHY THIS MATTERS**: A shutting-down service must not hang for the full
/// 30 second transport timeout on a stuck identity provider.
#[tokio::test]
async fn given_slow_login_when_context_cancelled_then_aborts_promptly() {
    // GIVEN: A login endpoint that answers after 10 seconds
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response(Some(60)).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;
    let provider = provider_for(&session_for(&server));
    let ctx = RequestContext::new();

    // WHEN: Cancelling shortly after the call starts
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });
    let started = Instant::now();
    let err = provider.token(&ctx).await.unwrap_err();

    // THEN: Cancelled long before the response would arrive
    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// **VALUE**: Verifies that `invalidate()` forces a fresh login.
#[tokio::test]
async fn given_invalidated_token_when_token_called_then_new_login() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 2).await;
    let provider = provider_for(&session_for(&server));
    let ctx = RequestContext::new();

    provider.token(&ctx).await.unwrap();
    provider.invalidate().await;
    provider.token(&ctx).await.unwrap();
}

/// **VALUE**: Verifies that sessions sharing a cache share tokens.
#[tokio::test]
async fn given_shared_cache_when_two_providers_ask_then_one_login() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    let cache = TokenCache::new();
    let first = provider_for(&session_with_cache(&server, cache.clone()));
    let second = provider_for(&session_with_cache(&server, cache.clone()));
    let ctx = RequestContext::new();

    first.token(&ctx).await.unwrap();
    second.token(&ctx).await.unwrap();

    assert_eq!(cache.len().await, 1);
}

/// **VALUE**: Verifies that concurrent callers all get a whole, valid bearer.
///
/// **BUG THIS CATCHES**: Would catch a reader seeing a partially written token
/// while another task refreshes it.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_callers_when_token_requested_then_all_receive_full_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response(Some(3600)))
        .mount(&server)
        .await;
    let provider = provider_for(&session_for(&server));

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let provider = provider.clone();
        tasks.push(tokio::spawn(async move {
            provider.token(&RequestContext::new()).await
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), expected_bearer());
    }

    let logins = server.received_requests().await.unwrap().len();
    assert!((1..=20).contains(&logins));
}
