//! Error handling for the participation tracker
//!
//! This module defines the main error type used throughout the application
//! and classifies errors so callers can decide whether to surface them as
//! recoverable notices or abort.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the participation tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Remote fetch failed during {operation}: {message}")]
    RemoteFetch { operation: &'static str, message: String },

    #[error("{operation} timed out after {limit:?}")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed report at line {line}: {message}")]
    ReportParse { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Student not found: {student_id}")]
    StudentNotFound { student_id: i32 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i32 },

    #[error("Prize not found: {prize_id}")]
    PrizeNotFound { prize_id: i32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Controller has been torn down")]
    ControllerClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    /// Wrap a database failure raised while servicing a store call
    pub fn remote(operation: &'static str, error: impl std::fmt::Display) -> Self {
        TrackerError::RemoteFetch {
            operation,
            message: error.to_string(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            TrackerError::Database(_) => true,
            TrackerError::Migration(_) => false,
            TrackerError::RemoteFetch { .. } => true,
            TrackerError::Timeout { .. } => true,
            TrackerError::FileWrite { .. } => true,
            TrackerError::ReportParse { .. } => false,
            TrackerError::Config(_) => false,
            TrackerError::ConfigLoad(_) => false,
            TrackerError::StudentNotFound { .. } => true,
            TrackerError::EventNotFound { .. } => true,
            TrackerError::PrizeNotFound { .. } => true,
            TrackerError::InvalidInput(_) => true,
            TrackerError::TaskFailed(_) => true,
            TrackerError::ControllerClosed => false,
            TrackerError::Serialization(_) => false,
            TrackerError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrackerError::Migration(_) => ErrorSeverity::Critical,
            TrackerError::Config(_) => ErrorSeverity::Critical,
            TrackerError::ConfigLoad(_) => ErrorSeverity::Critical,
            TrackerError::RemoteFetch { .. } => ErrorSeverity::Warning,
            TrackerError::Timeout { .. } => ErrorSeverity::Warning,
            TrackerError::InvalidInput(_) => ErrorSeverity::Info,
            TrackerError::ControllerClosed => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failures_are_recoverable_warnings() {
        let err = TrackerError::remote("list_students", "connection reset");
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(
            err.to_string(),
            "Remote fetch failed during list_students: connection reset"
        );
    }

    #[test]
    fn test_file_write_error_names_path() {
        let err = TrackerError::FileWrite {
            path: PathBuf::from("/nope/report.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("/nope/report.csv"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = TrackerError::Config("missing url".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.severity().to_string(), "CRITICAL");
    }
}
