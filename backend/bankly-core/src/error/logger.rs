use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LoggerError {
    #[error("Log File Error: {message} {location}")]
    LogFile {
        message: String,
        location: ErrorLocation,
    },

    #[error("Logger Init Error: {message} {location}")]
    Init {
        message: String,
        location: ErrorLocation,
    },
}

impl LoggerError {
    #[track_caller]
    pub fn log_file(message: impl Into<String>) -> Self {
        LoggerError::LogFile {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn init(message: impl Into<String>) -> Self {
        LoggerError::Init {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
