//! Error types for the OAuth2 token exchange.
//!
//! Kept separate from [`DomainError`](crate::taxonomy::DomainError): a
//! rejected login is a credentials problem, not a business rule violation.

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LoginError {
    /// The login endpoint answered 400 (bad client id/secret, bad scope).
    #[error("Login Rejected: {message} {location}")]
    Rejected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Login Failed: HTTP {status} - {body} {location}")]
    UnexpectedStatus {
        status: HttpStatusCode,
        body: String,
        location: ErrorLocation,
    },

    #[error("Login Transport Error: {source} {location}")]
    Transport {
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Login Response Invalid: {message} {location}")]
    InvalidResponse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Login Cancelled {location}")]
    Cancelled { location: ErrorLocation },
}

impl LoginError {
    #[track_caller]
    pub fn rejected(message: impl Into<String>) -> Self {
        LoginError::Rejected {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        LoginError::UnexpectedStatus {
            status: HttpStatusCode(status),
            body: body.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn transport(source: reqwest::Error) -> Self {
        LoginError::Transport {
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    #[track_caller]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        LoginError::InvalidResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cancelled() -> Self {
        LoginError::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// HTTP status returned by the login endpoint, if one was received.
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            LoginError::Rejected { .. } => Some(HttpStatusCode::BAD_REQUEST),
            LoginError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoginError::Cancelled { .. })
    }
}
