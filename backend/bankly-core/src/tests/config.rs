use crate::auth::cache::{DEFAULT_TOKEN_TTL, TokenCache};
use crate::config::{CLIENT_ID_ENV, CLIENT_SECRET_ENV, Environment, Session, SessionConfig};
use crate::error::ConfigError;
use crate::{DEFAULT_API_VERSION, SANDBOX_API_ENDPOINT, SANDBOX_LOGIN_ENDPOINT};

use std::collections::HashMap;
use std::time::Duration;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

/// **VALUE**: Verifies that a config carrying only credentials resolves to the
/// sandbox endpoints and API version "1.0".
///
/// **WHY THIS MATTERS**: Most integrators start against the sandbox with just a
/// client id and secret. Every omitted field must have a working default.
///
/// **BUG THIS CATCHES**: Would catch a default endpoint typo, or a default that
/// is left empty and only fails at the first request.
#[test]
fn given_only_credentials_when_session_resolved_then_sandbox_defaults_apply() {
    // GIVEN: Credentials only
    let config = SessionConfig::new("client", "secret");

    // WHEN: Resolving without environment
    let session = Session::resolve_with(config, no_env).unwrap();

    // THEN: Sandbox defaults are filled in
    assert_eq!(session.login_endpoint().as_str(), SANDBOX_LOGIN_ENDPOINT);
    assert_eq!(session.api_endpoint().as_str(), SANDBOX_API_ENDPOINT);
    assert_eq!(session.api_version(), DEFAULT_API_VERSION);
    assert_eq!(
        session.token_url().as_str(),
        "https://login.sandbox.bankly.com.br/connect/token"
    );
    assert_eq!(session.client_id(), "client");
    assert_eq!(session.client_secret().expose(), "secret");
    assert_eq!(session.token_cache().default_ttl(), DEFAULT_TOKEN_TTL);
}

/// **VALUE**: Verifies that the production environment switches both default endpoints.
///
/// **BUG THIS CATCHES**: Would catch a production session silently talking to the sandbox.
#[test]
fn given_production_environment_when_session_resolved_then_production_endpoints_apply() {
    // GIVEN: Production selected, no explicit endpoints
    let config = SessionConfig::new("client", "secret").with_environment(Environment::Production);

    // WHEN: Resolving
    let session = Session::resolve_with(config, no_env).unwrap();

    // THEN: Production hosts are used
    assert_eq!(session.login_endpoint().as_str(), "https://login.bankly.com.br/");
    assert_eq!(session.api_endpoint().as_str(), "https://api.bankly.com.br/");
}

/// **VALUE**: Verifies that explicit endpoints win over the environment defaults
/// and gain a trailing slash.
///
/// **BUG THIS CATCHES**: Would catch `https://host/v2` being joined as
/// `https://host/cards` because the last path segment was replaced.
#[test]
fn given_explicit_endpoints_without_slash_when_resolved_then_trailing_slash_added() {
    // GIVEN: Endpoints without trailing slash
    let config = SessionConfig::new("client", "secret")
        .with_environment(Environment::Production)
        .with_login_endpoint("http://127.0.0.1:9000/auth")
        .with_api_endpoint("http://127.0.0.1:9001/v2")
        .with_api_version("2.0");

    // WHEN: Resolving
    let session = Session::resolve_with(config, no_env).unwrap();

    // THEN: Explicit values are kept and normalized
    assert_eq!(session.login_endpoint().as_str(), "http://127.0.0.1:9000/auth/");
    assert_eq!(
        session.token_url().as_str(),
        "http://127.0.0.1:9000/auth/connect/token"
    );
    assert_eq!(session.api_endpoint().as_str(), "http://127.0.0.1:9001/v2/");
    assert_eq!(session.api_version(), "2.0");
}

/// **VALUE**: Verifies that credentials missing from the config are read from
/// `BANKLY_CLIENT_ID` / `BANKLY_CLIENT_SECRET`.
///
/// **WHY THIS MATTERS**: Deployments inject secrets through the environment
/// rather than code.
///
/// **BUG THIS CATCHES**: Would catch the fallback reading the wrong variable names.
#[test]
fn given_credentials_in_environment_when_config_empty_then_environment_used() {
    // GIVEN: Empty config and both variables set
    let lookup = env_from(&[(CLIENT_ID_ENV, "env-client"), (CLIENT_SECRET_ENV, "env-secret")]);

    // WHEN: Resolving
    let session = Session::resolve_with(SessionConfig::default(), lookup).unwrap();

    // THEN: Environment values are used
    assert_eq!(session.client_id(), "env-client");
    assert_eq!(session.client_secret().expose(), "env-secret");
}

/// **VALUE**: Verifies that config values win over environment variables.
#[test]
fn given_credentials_in_both_when_resolved_then_config_wins() {
    let lookup = env_from(&[(CLIENT_ID_ENV, "env-client"), (CLIENT_SECRET_ENV, "env-secret")]);

    let session =
        Session::resolve_with(SessionConfig::new("cfg-client", "cfg-secret"), lookup).unwrap();

    assert_eq!(session.client_id(), "cfg-client");
    assert_eq!(session.client_secret().expose(), "cfg-secret");
}

/// **VALUE**: Verifies that a missing secret fails construction with the
/// credentials-missing error and names the missing field.
///
/// **WHY THIS MATTERS**: Misconfiguration must fail at startup, not at the
/// first payment.
///
/// **BUG THIS CATCHES**: Would catch a session built with an empty secret that
/// later surfaces as a confusing 400 from the login endpoint.
#[test]
fn given_missing_secret_when_resolved_then_credentials_missing_error() {
    // GIVEN: Client id only, nothing in the environment
    let config = SessionConfig {
        client_id: Some("client".to_string()),
        ..SessionConfig::default()
    };

    // WHEN: Resolving
    let err = Session::resolve_with(config, no_env).unwrap_err();

    // THEN: Credentials missing, naming the secret
    assert!(err.is_credentials_missing());
    match err {
        ConfigError::ClientCredentialsMissing { missing, .. } => {
            assert_eq!(missing, "client_secret")
        }
        other => panic!("expected ClientCredentialsMissing, got {other:?}"),
    }
}

/// **VALUE**: Verifies that whitespace-only credentials count as missing, in
/// config and environment alike.
#[test]
fn given_blank_credentials_when_resolved_then_credentials_missing_error() {
    let lookup = env_from(&[(CLIENT_ID_ENV, "   "), (CLIENT_SECRET_ENV, "")]);

    let err = Session::resolve_with(SessionConfig::new("  ", " "), lookup).unwrap_err();

    match err {
        ConfigError::ClientCredentialsMissing { missing, .. } => {
            assert_eq!(missing, "client_id and client_secret")
        }
        other => panic!("expected ClientCredentialsMissing, got {other:?}"),
    }
}

/// **VALUE**: Verifies that non-http endpoints are rejected at construction.
///
/// **BUG THIS CATCHES**: Would catch `ftp://` or relative strings being accepted
/// and only failing at dispatch time.
#[test]
fn given_invalid_endpoints_when_resolved_then_invalid_endpoint_error() {
    for endpoint in ["not a url", "ftp://files.example.com/", "mailto:ops@example.com"] {
        let config = SessionConfig::new("client", "secret").with_api_endpoint(endpoint);

        let err = Session::resolve_with(config, no_env).unwrap_err();

        assert!(
            matches!(err, ConfigError::InvalidEndpoint { field: "api_endpoint", .. }),
            "{endpoint} should be rejected, got {err:?}"
        );
    }
}

/// **VALUE**: Verifies that an explicitly blank API version is rejected rather
/// than sent as an empty `api-version` header.
#[test]
fn given_blank_api_version_when_resolved_then_validation_error() {
    let config = SessionConfig::new("client", "secret").with_api_version("  ");

    let err = Session::resolve_with(config, no_env).unwrap_err();

    assert!(matches!(err, ConfigError::Validation { .. }));
}

/// **VALUE**: Verifies the cache handed in is the one the session uses, and
/// that the configured TTL shapes the default cache otherwise.
///
/// **BUG THIS CATCHES**: Would catch a supplied cache being replaced, which
/// breaks token sharing between sessions.
#[tokio::test]
async fn given_cache_options_when_resolved_then_cache_used_as_configured() {
    // GIVEN: A shared cache for one session, a TTL for another
    let shared = TokenCache::with_default_ttl(Duration::from_secs(42));
    let with_cache = SessionConfig::new("a", "b").with_cache(shared.clone());
    let with_ttl = SessionConfig::new("a", "b").with_token_cache_ttl(Duration::from_secs(90));

    // WHEN: Resolving both
    let first = Session::resolve_with(with_cache, no_env).unwrap();
    let second = Session::resolve_with(with_ttl, no_env).unwrap();

    // THEN: The shared cache is kept, the TTL applied
    assert_eq!(first.token_cache().default_ttl(), Duration::from_secs(42));
    assert_eq!(second.token_cache().default_ttl(), Duration::from_secs(90));
}

/// **VALUE**: Verifies environment names parse case-insensitively and unknown
/// names are rejected.
#[test]
fn given_environment_names_when_parsed_then_known_names_accepted() {
    assert_eq!("Sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
    assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
    assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
    assert!("staging".parse::<Environment>().is_err());
}

/// **VALUE**: Verifies `from_lookup` maps every `BANKLY_*` variable and parses
/// the human-readable TTL.
#[test]
fn given_bankly_variables_when_loaded_from_lookup_then_all_fields_set() {
    let lookup = env_from(&[
        ("BANKLY_CLIENT_ID", "client"),
        ("BANKLY_CLIENT_SECRET", "secret"),
        ("BANKLY_ENVIRONMENT", "production"),
        ("BANKLY_API_ENDPOINT", "https://api.example.com/v2/"),
        ("BANKLY_API_VERSION", "1.1"),
        ("BANKLY_SCOPE", "pix.read"),
        ("BANKLY_TOKEN_CACHE_TTL", "5m"),
    ]);

    let config = SessionConfig::from_lookup(lookup).unwrap();

    assert_eq!(config.client_id.as_deref(), Some("client"));
    assert_eq!(config.environment, Some(Environment::Production));
    assert_eq!(config.api_endpoint.as_deref(), Some("https://api.example.com/v2/"));
    assert_eq!(config.login_endpoint, None);
    assert_eq!(config.api_version.as_deref(), Some("1.1"));
    assert_eq!(config.scope.as_deref(), Some("pix.read"));
    assert_eq!(config.token_cache_ttl, Some(Duration::from_secs(300)));
}

/// **VALUE**: Verifies that an unparseable TTL variable is a validation error.
#[test]
fn given_bad_ttl_variable_when_loaded_from_lookup_then_validation_error() {
    let lookup = env_from(&[("BANKLY_TOKEN_CACHE_TTL", "ten minutes")]);

    let err = SessionConfig::from_lookup(lookup).unwrap_err();

    assert!(matches!(err, ConfigError::Validation { .. }));
}

/// **VALUE**: Verifies that the client secret never shows up in `Debug` output
/// of the config or the session.
///
/// **BUG THIS CATCHES**: Would catch a `String` field sneaking the secret into logs.
#[test]
fn given_session_when_debug_formatted_then_secret_is_redacted() {
    let config = SessionConfig::new("client", "super-secret-value");
    let session = Session::resolve_with(config.clone(), no_env).unwrap();

    assert!(!format!("{config:?}").contains("super-secret-value"));
    assert!(!format!("{session:?}").contains("super-secret-value"));
}
