//! Error types for calhelper drivers.

use thiserror::Error;

/// Errors that can occur in calhelper operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("Calendar API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CalendarError {
    fn from(e: serde_json::Error) -> Self {
        CalendarError::Serialization(e.to_string())
    }
}

/// Result type alias for calhelper operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
