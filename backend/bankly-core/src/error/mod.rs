pub mod config;
pub mod logger;
pub mod login;
pub mod transport;

pub use config::ConfigError;
pub use logger::LoggerError;
pub use login::LoginError;
pub use transport::TransportError;

use crate::taxonomy::{DomainError, ErrorKind};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error;

/// Every failure the SDK can return.
///
/// Callers match on the variant instead of downcasting:
///
/// ```rust,ignore
/// match client.get(&ctx, "account/123/balance", &[], None).await {
///     Ok(response) => { /* decode */ }
///     Err(BanklyError::Domain(e)) if e.is(ErrorKind::EntryNotFound) => { /* 404 */ }
///     Err(BanklyError::Transport(e)) => { /* could not reach the service */ }
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Error)]
pub enum BanklyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Authentication(#[from] LoginError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The outbound request could not be built (bad path, unserializable body).
    #[error("Request Build Error: {message} {location}")]
    Request {
        message: String,
        location: ErrorLocation,
    },

    /// A success response body did not match the expected shape.
    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },
}

impl BanklyError {
    #[track_caller]
    pub fn request(message: impl Into<String>) -> Self {
        BanklyError::Request {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        BanklyError::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            BanklyError::Domain(error) => Some(error),
            _ => None,
        }
    }

    /// Stable taxonomy key for business failures.
    pub fn error_key(&self) -> Option<&str> {
        self.domain().map(DomainError::key)
    }

    /// True if this is the given catalog error.
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.domain().is_some_and(|e| e.is(kind))
    }

    /// Cancelled through the request context, either during login or dispatch.
    pub fn is_cancelled(&self) -> bool {
        match self {
            BanklyError::Transport(e) => e.is_cancelled(),
            BanklyError::Authentication(e) => e.is_cancelled(),
            _ => false,
        }
    }

    /// HTTP status of the upstream answer, when there was one.
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            BanklyError::Domain(e) => Some(e.http_status()),
            BanklyError::Authentication(e) => e.status_code(),
            _ => None,
        }
    }

    /// Short category name for metrics and log fields.
    pub fn error_category(&self) -> &'static str {
        match self {
            BanklyError::Config(_) => "config",
            BanklyError::Transport(e) if e.is_cancelled() => "cancelled",
            BanklyError::Transport(e) if e.is_timeout() => "timeout",
            BanklyError::Transport(e) if e.is_connect() => "connection",
            BanklyError::Transport(_) => "transport",
            BanklyError::Authentication(_) => "authentication",
            BanklyError::Domain(e) if e.kind().is_none() => "unmapped",
            BanklyError::Domain(_) => "domain",
            BanklyError::Request { .. } => "request",
            BanklyError::Decode { .. } => "decode",
        }
    }
}

impl From<url::ParseError> for BanklyError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        BanklyError::Request {
            message: format!("URL parse error: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
