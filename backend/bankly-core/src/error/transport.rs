use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// The service could not be reached, or the caller gave up waiting.
///
/// The original `reqwest` error is kept as the source so callers can tell a
/// DNS failure from a timeout.
#[derive(Debug, ThisError)]
pub enum TransportError {
    #[error("HTTP Transport Error: {source} {location}")]
    Http {
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request Cancelled {location}")]
    Cancelled { location: ErrorLocation },
}

impl TransportError {
    #[track_caller]
    pub fn cancelled() -> Self {
        TransportError::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Http { source, .. } => source.is_timeout(),
            TransportError::Cancelled { .. } => false,
        }
    }

    pub fn is_connect(&self) -> bool {
        match self {
            TransportError::Http { source, .. } => source.is_connect(),
            TransportError::Cancelled { .. } => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled { .. })
    }
}

impl From<reqwest::Error> for TransportError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        TransportError::Http {
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }
}
