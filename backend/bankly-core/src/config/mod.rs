pub mod sources;

use crate::auth::cache::{DEFAULT_TOKEN_TTL, TokenCache};
use crate::error::config::ConfigError;
use crate::{
    DEFAULT_API_VERSION, PRODUCTION_API_ENDPOINT, PRODUCTION_LOGIN_ENDPOINT, SANDBOX_API_ENDPOINT,
    SANDBOX_LOGIN_ENDPOINT,
};

use common::RedactedSecret;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Deserializer};
use url::Url;

pub const CLIENT_ID_ENV: &str = "BANKLY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "BANKLY_CLIENT_SECRET";

const TOKEN_PATH: &str = "connect/token";

// ============================================
// ENVIRONMENT
// ============================================

/// Which Bankly deployment the default endpoints point at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn login_endpoint(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_LOGIN_ENDPOINT,
            Environment::Production => PRODUCTION_LOGIN_ENDPOINT,
        }
    }

    pub fn api_endpoint(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_API_ENDPOINT,
            Environment::Production => PRODUCTION_API_ENDPOINT,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::validation(format!(
                "Unknown environment '{other}' (expected sandbox or production)"
            ))),
        }
    }
}

// ============================================
// SESSION CONFIG (INPUT)
// ============================================

/// Unvalidated connection settings.
///
/// Every field is optional here; [`Session::new`] fills defaults, falls back
/// to the environment for credentials and rejects what is still missing.
///
/// ```rust,ignore
/// let session = Session::new(
///     SessionConfig::new("my-client-id", "my-secret")
///         .with_environment(Environment::Production),
/// )?;
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<RedactedSecret>,
    #[serde(default)]
    pub environment: Option<Environment>,
    #[serde(default)]
    pub login_endpoint: Option<String>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Default token lifetime for the cache created when `cache` is unset,
    /// written as a human duration (`"10m"`, `"90s"`).
    #[serde(default, deserialize_with = "deserialize_ttl")]
    pub token_cache_ttl: Option<Duration>,
    #[serde(skip)]
    pub cache: Option<TokenCache>,
}

impl SessionConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<RedactedSecret>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    #[must_use]
    pub fn with_login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn with_token_cache_ttl(mut self, ttl: Duration) -> Self {
        self.token_cache_ttl = Some(ttl);
        self
    }

    /// Share an existing cache (and its tokens) with this session.
    #[must_use]
    pub fn with_cache(mut self, cache: TokenCache) -> Self {
        self.cache = Some(cache);
        self
    }
}

fn deserialize_ttl<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| humantime::parse_duration(value.trim()).map_err(serde::de::Error::custom))
        .transpose()
}

// ============================================
// SESSION (VALIDATED)
// ============================================

/// Validated, immutable connection settings plus the token cache handle.
#[derive(Debug, Clone)]
pub struct Session {
    login_endpoint: Url,
    token_url: Url,
    api_endpoint: Url,
    client_id: String,
    client_secret: RedactedSecret,
    api_version: String,
    scope: Option<String>,
    token_cache: TokenCache,
}

impl Session {
    /// Validate `config`, reading missing credentials from
    /// `BANKLY_CLIENT_ID` / `BANKLY_CLIENT_SECRET`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ClientCredentialsMissing`] if a credential is still empty
    /// - [`ConfigError::InvalidEndpoint`] if an endpoint is not an absolute http(s) URL
    /// - [`ConfigError::Validation`] if the API version is blank
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(config, |name| env::var(name).ok())
    }

    /// [`Session::new`] with an explicit variable lookup instead of the
    /// process environment.
    pub fn resolve_with<F>(config: SessionConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = non_blank(config.client_id).or_else(|| non_blank(lookup(CLIENT_ID_ENV)));
        let client_secret = config
            .client_secret
            .filter(|secret| !secret.is_blank())
            .or_else(|| non_blank(lookup(CLIENT_SECRET_ENV)).map(RedactedSecret::new));

        let (client_id, client_secret) = match (client_id, client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            (None, None) => return Err(ConfigError::credentials_missing("client_id and client_secret")),
            (None, Some(_)) => return Err(ConfigError::credentials_missing("client_id")),
            (Some(_), None) => return Err(ConfigError::credentials_missing("client_secret")),
        };

        let environment = config.environment.unwrap_or_default();

        let login_endpoint = parse_endpoint(
            "login_endpoint",
            non_blank(config.login_endpoint).as_deref().unwrap_or(environment.login_endpoint()),
        )?;
        let api_endpoint = parse_endpoint(
            "api_endpoint",
            non_blank(config.api_endpoint).as_deref().unwrap_or(environment.api_endpoint()),
        )?;
        let token_url = login_endpoint.join(TOKEN_PATH).map_err(|e| {
            ConfigError::invalid_endpoint("login_endpoint", login_endpoint.as_str(), e.to_string())
        })?;

        let api_version = match config.api_version {
            None => DEFAULT_API_VERSION.to_string(),
            Some(version) if version.trim().is_empty() => {
                return Err(ConfigError::validation("api_version cannot be empty"));
            }
            Some(version) => version.trim().to_string(),
        };

        let token_cache = config.cache.unwrap_or_else(|| {
            TokenCache::with_default_ttl(config.token_cache_ttl.unwrap_or(DEFAULT_TOKEN_TTL))
        });

        debug!(
            "Session resolved: login={}, api={}, api_version={}",
            login_endpoint, api_endpoint, api_version
        );

        Ok(Self {
            login_endpoint,
            token_url,
            api_endpoint,
            client_id,
            client_secret,
            api_version,
            scope: non_blank(config.scope),
            token_cache,
        })
    }

    pub fn login_endpoint(&self) -> &Url {
        &self.login_endpoint
    }

    /// `{login_endpoint}/connect/token`.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Base URL every API path is joined onto; always ends with `/`.
    pub fn api_endpoint(&self) -> &Url {
        &self.api_endpoint
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &RedactedSecret {
        &self.client_secret
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.token_cache
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[track_caller]
fn parse_endpoint(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim())
        .map_err(|e| ConfigError::invalid_endpoint(field, value, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid_endpoint(
            field,
            value,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::invalid_endpoint(field, value, "not a base URL"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
