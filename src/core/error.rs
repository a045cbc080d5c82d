//! Error types for casewatch.

use crate::records::RecordCategory;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for casewatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while computing SLA snapshots.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration read failed: {0}")]
    ConfigurationRead(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Record store errors
    #[error("Record query failed for {category}: {message}")]
    RecordQuery {
        category: RecordCategory,
        message: String,
    },

    // Tick errors
    #[error("SLA tick exceeded its time budget of {0:?}")]
    TickTimeout(Duration),

    // Alert delivery errors
    #[error("Notification failed: {0}")]
    Notification(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a failed read against one record category.
    pub fn record_query(category: RecordCategory, message: impl Into<String>) -> Self {
        Error::RecordQuery {
            category,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_query_display() {
        let err = Error::record_query(RecordCategory::Payment, "connection reset");
        assert_eq!(
            err.to_string(),
            "Record query failed for payment: connection reset"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::TickTimeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "SLA tick exceeded its time budget of 30s");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::SerializationError(_)));
    }
}
