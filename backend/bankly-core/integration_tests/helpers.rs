//! Test helpers for pipeline integration tests.
//!
//! One `wiremock` server plays both the login and the API endpoint: the token
//! route lives at `/connect/token`, API routes under `/api/`.

use bankly_core::{BanklyClient, Session, SessionConfig, TokenCache};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CLIENT_ID: &str = "test-client";
pub const TEST_CLIENT_SECRET: &str = "test-secret";
pub const TEST_ACCESS_TOKEN: &str = "access-token-123";
pub const TOKEN_PATH: &str = "/connect/token";
pub const API_PREFIX: &str = "/api/";

/// Config pointing both endpoints at `server`.
pub fn config_for(server: &MockServer) -> SessionConfig {
    SessionConfig::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
        .with_login_endpoint(server.uri())
        .with_api_endpoint(format!("{}{API_PREFIX}", server.uri()))
}

pub fn session_for(server: &MockServer) -> Session {
    Session::new(config_for(server)).expect("test session should resolve")
}

pub fn session_with_cache(server: &MockServer, cache: TokenCache) -> Session {
    Session::new(config_for(server).with_cache(cache)).expect("test session should resolve")
}

pub fn client_for(server: &MockServer) -> BanklyClient {
    BanklyClient::new(session_for(server)).expect("test client should build")
}

/// A successful token response.
pub fn token_response(expires_in: Option<u64>) -> ResponseTemplate {
    let mut body = json!({
        "access_token": TEST_ACCESS_TOKEN,
        "token_type": "Bearer",
    });
    if let Some(seconds) = expires_in {
        body["expires_in"] = json!(seconds);
    }
    ResponseTemplate::new(200).set_body_json(body)
}

/// Mount the token route, expecting exactly `expected_calls` logins.
pub async fn mount_login(server: &MockServer, expires_in: Option<u64>, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response(expires_in))
        .expect(expected_calls)
        .named("token endpoint")
        .mount(server)
        .await;
}

/// Full API path for `relative`.
pub fn api_path(relative: &str) -> String {
    format!("{API_PREFIX}{}", relative.trim_start_matches('/'))
}

pub fn expected_bearer() -> String {
    format!("Bearer {TEST_ACCESS_TOKEN}")
}
