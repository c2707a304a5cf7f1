use crate::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Raised when code tries to move a redacted secret somewhere it would leak.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Secret Serialization Refused: {what} {location}")]
    SerializationRefused {
        what: &'static str,
        location: ErrorLocation,
    },
}

impl RedactError {
    #[track_caller]
    pub fn serialization_refused(what: &'static str) -> Self {
        RedactError::SerializationRefused {
            what,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
