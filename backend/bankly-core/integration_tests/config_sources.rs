use bankly_core::config::sources::{
    API_ENDPOINT_ENV, API_VERSION_ENV, ENVIRONMENT_ENV, LOGIN_ENDPOINT_ENV, SCOPE_ENV,
    TOKEN_CACHE_TTL_ENV,
};
use bankly_core::config::{CLIENT_ID_ENV, CLIENT_SECRET_ENV};
use bankly_core::{ConfigError, Environment, Session, SessionConfig};

use std::io::Write;
use std::time::Duration;

use serial_test::serial;

const ALL_VARS: &[&str] = &[
    CLIENT_ID_ENV,
    CLIENT_SECRET_ENV,
    ENVIRONMENT_ENV,
    LOGIN_ENDPOINT_ENV,
    API_ENDPOINT_ENV,
    API_VERSION_ENV,
    SCOPE_ENV,
    TOKEN_CACHE_TTL_ENV,
];

fn clear_env() {
    for name in ALL_VARS {
        // SAFETY: env-mutating tests run under #[serial]
        unsafe { std::env::remove_var(name) };
    }
}

fn set_env(name: &str, value: &str) {
    // SAFETY: env-mutating tests run under #[serial]
    unsafe { std::env::set_var(name, value) };
}

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// **VALUE**: Verifies that a TOML file with every field resolves into a session.
///
/// **WHY THIS MATTERS**: Services keep non-secret settings in a checked-in
/// config file.
#[test]
fn given_full_toml_file_when_loaded_then_session_resolves() {
    // GIVEN: A TOML file
    let file = write_toml(
        r#"
client_id = "toml-client"
client_secret = "toml-secret"
environment = "production"
api_endpoint = "https://api.example.com/v2"
api_version = "1.2"
scope = "cards.read"
token_cache_ttl = "2m"
"#,
    );

    // WHEN: Loading and resolving
    let config = SessionConfig::from_toml_file(file.path()).unwrap();
    let session = Session::new(config).unwrap();

    // THEN: Explicit endpoint kept, production login default used
    assert_eq!(session.client_id(), "toml-client");
    assert_eq!(session.api_endpoint().as_str(), "https://api.example.com/v2/");
    assert_eq!(session.login_endpoint().as_str(), "https://login.bankly.com.br/");
    assert_eq!(session.api_version(), "1.2");
    assert_eq!(session.scope(), Some("cards.read"));
    assert_eq!(session.token_cache().default_ttl(), Duration::from_secs(120));
}

/// **VALUE**: Verifies that a missing file is a read error naming the path.
#[test]
fn given_missing_toml_file_when_loaded_then_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = SessionConfig::from_toml_file(&missing).unwrap_err();

    match err {
        ConfigError::Read { path, .. } => assert_eq!(path, missing),
        other => panic!("expected Read, got {other:?}"),
    }
}

/// **VALUE**: Verifies that malformed TOML and bad field values are parse errors.
#[test]
fn given_malformed_toml_when_loaded_then_parse_error() {
    for contents in [
        "client_id = ",
        "environment = \"staging\"",
        "token_cache_ttl = \"soon\"",
    ] {
        let file = write_toml(contents);

        let err = SessionConfig::from_toml_file(file.path()).unwrap_err();

        assert!(
            matches!(err, ConfigError::Parse { .. }),
            "{contents:?} should fail to parse, got {err:?}"
        );
    }
}

/// **VALUE**: Verifies that `from_env` reads every `BANKLY_*` variable.
#[test]
#[serial]
fn given_bankly_environment_when_loaded_then_session_uses_it() {
    // GIVEN: A complete environment
    clear_env();
    set_env(CLIENT_ID_ENV, "env-client");
    set_env(CLIENT_SECRET_ENV, "env-secret");
    set_env(ENVIRONMENT_ENV, "sandbox");
    set_env(LOGIN_ENDPOINT_ENV, "http://127.0.0.1:8080/login");
    set_env(API_VERSION_ENV, "1.1");
    set_env(TOKEN_CACHE_TTL_ENV, "30s");

    // WHEN: Loading and resolving
    let config = SessionConfig::from_env().unwrap();
    let session = Session::new(config).unwrap();
    clear_env();

    // THEN: Every variable applied
    assert_eq!(session.client_id(), "env-client");
    assert_eq!(session.login_endpoint().as_str(), "http://127.0.0.1:8080/login/");
    assert_eq!(session.api_endpoint().as_str(), "https://api.sandbox.bankly.com.br/");
    assert_eq!(session.api_version(), "1.1");
    assert_eq!(session.token_cache().default_ttl(), Duration::from_secs(30));
}

/// **VALUE**: Verifies that `Session::new` falls back to the process environment
/// for credentials.
#[test]
#[serial]
fn given_credentials_only_in_environment_when_session_created_then_resolved() {
    clear_env();
    set_env(CLIENT_ID_ENV, "from-env");
    set_env(CLIENT_SECRET_ENV, "from-env-secret");

    let result = Session::new(SessionConfig::default().with_environment(Environment::Sandbox));
    clear_env();

    assert_eq!(result.unwrap().client_id(), "from-env");
}

/// **VALUE**: Verifies that with no credentials anywhere, construction fails
/// and no session is returned.
///
/// **BUG THIS CATCHES**: Would catch a session being built with empty
/// credentials that only fails on the first login.
#[test]
#[serial]
fn given_no_credentials_anywhere_when_session_created_then_credentials_missing() {
    clear_env();

    let result = Session::new(SessionConfig::default());

    let err = result.unwrap_err();
    assert!(err.is_credentials_missing(), "{err:?}");
}
