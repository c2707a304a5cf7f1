use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a [`Session`](crate::config::Session).
///
/// All of these surface at construction time, never during a call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Client Credentials Missing: {missing} not set and not found in environment {location}")]
    ClientCredentialsMissing {
        missing: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid Endpoint: {field} = '{value}': {reason} {location}")]
    InvalidEndpoint {
        field: &'static str,
        value: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Config Read Error: {path}: {source} {location}")]
    Read {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    Parse {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Config Validation Error: {reason} {location}")]
    Validation {
        location: ErrorLocation,
        reason: String,
    },

    #[error("HTTP Client Build Error: {message} {location}")]
    HttpClient {
        message: String,
        location: ErrorLocation,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn credentials_missing(missing: &'static str) -> Self {
        ConfigError::ClientCredentialsMissing {
            missing,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_endpoint(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidEndpoint {
            field,
            value: value.into(),
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(reason: impl Into<String>) -> Self {
        ConfigError::Validation {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// True for the credentials-missing case, so callers can prompt for setup.
    pub fn is_credentials_missing(&self) -> bool {
        matches!(self, ConfigError::ClientCredentialsMissing { .. })
    }
}

impl From<reqwest::Error> for ConfigError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ConfigError::HttpClient {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
