//! Loading a [`SessionConfig`] from the environment or a TOML file.

use super::{CLIENT_ID_ENV, CLIENT_SECRET_ENV, Environment, SessionConfig};
use crate::error::config::ConfigError;

use common::{ErrorLocation, RedactedSecret};

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

pub const ENVIRONMENT_ENV: &str = "BANKLY_ENVIRONMENT";
pub const LOGIN_ENDPOINT_ENV: &str = "BANKLY_LOGIN_ENDPOINT";
pub const API_ENDPOINT_ENV: &str = "BANKLY_API_ENDPOINT";
pub const API_VERSION_ENV: &str = "BANKLY_API_VERSION";
pub const SCOPE_ENV: &str = "BANKLY_SCOPE";
pub const TOKEN_CACHE_TTL_ENV: &str = "BANKLY_TOKEN_CACHE_TTL";

/// Result of the `.env` probe.
#[derive(Debug, Clone, Default)]
pub struct EnvLoadResult {
    /// Path of the loaded file, if any.
    pub path: Option<PathBuf>,
    /// Whether any .env file was loaded.
    pub loaded: bool,
}

impl SessionConfig {
    /// Build a config from `BANKLY_*` variables, loading a `.env` file first
    /// if one is found.
    ///
    /// Variables already set in the process win over `.env` entries.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_result = try_load_dotenv();
        if !env_result.loaded {
            debug!("No .env file found - reading existing environment variables");
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`SessionConfig::from_env`] with an explicit lookup and no
    /// `.env` probe.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment = read(ENVIRONMENT_ENV)
            .map(|value| value.parse::<Environment>())
            .transpose()?;

        let token_cache_ttl = read(TOKEN_CACHE_TTL_ENV)
            .map(|value| {
                humantime::parse_duration(value.trim()).map_err(|e| {
                    ConfigError::validation(format!("{TOKEN_CACHE_TTL_ENV} = '{value}': {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            client_id: read(CLIENT_ID_ENV),
            client_secret: read(CLIENT_SECRET_ENV).map(RedactedSecret::new),
            environment,
            login_endpoint: read(LOGIN_ENDPOINT_ENV),
            api_endpoint: read(API_ENDPOINT_ENV),
            api_version: read(API_VERSION_ENV),
            scope: read(SCOPE_ENV),
            token_cache_ttl,
            cache: None,
        })
    }

    /// Parse a TOML file holding the same keys as [`SessionConfig`].
    ///
    /// ```toml
    /// client_id = "my-client"
    /// client_secret = "my-secret"
    /// environment = "production"
    /// api_version = "1.0"
    /// token_cache_ttl = "5m"
    /// ```
    ///
    /// Missing credentials are not an error here; [`Session::new`](super::Session::new)
    /// still falls back to the environment for them.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::from_toml_str(&contents).map_err(|reason| ConfigError::Parse {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            reason,
        })?;

        info!("Session config loaded from {}", path.display());
        Ok(config)
    }

    fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }
}

/// Attempts to load .env from known locations.
pub fn try_load_dotenv() -> EnvLoadResult {
    // Current directory first
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return EnvLoadResult {
            path: Some(path),
            loaded: true,
        };
    }

    // Then the executable's directory
    let Some(env_path) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")))
    else {
        return EnvLoadResult::default();
    };

    if !env_path.exists() {
        return EnvLoadResult::default();
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {:?}", env_path);
            EnvLoadResult {
                path: Some(env_path),
                loaded: true,
            }
        }
        Err(e) => {
            warn!("Failed to parse .env at {:?}: {}", env_path, e);
            EnvLoadResult::default()
        }
    }
}
