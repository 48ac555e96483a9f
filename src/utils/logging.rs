//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the participation tracker.

use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::{Result, TrackerError};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for as long as the process logs.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| TrackerError::Config(format!("Failed to install log subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of a list reload
pub fn log_reload(list: &str, token: u64, rows: usize, committed: bool) {
    if committed {
        debug!(list = list, token = token, rows = rows, "Reload committed");
    } else {
        debug!(list = list, token = token, rows = rows, "Stale reload discarded");
    }
}

/// Log a generated CSV artifact
pub fn log_report_written(kind: &str, path: &Path, rows: usize) {
    info!(
        kind = kind,
        path = %path.display(),
        rows = rows,
        "Report written"
    );
}

/// Log the result of a winner selection run
pub fn log_winner_selection(students: usize, prizes: usize, empty_buckets: usize) {
    info!(
        students = students,
        prizes = prizes,
        empty_buckets = empty_buckets,
        "Winners selected"
    );
}

/// Log a student whose grade falls outside the tracked grade levels
pub fn log_grade_anomaly(student_id: i32, grade: i32) {
    warn!(
        student_id = student_id,
        grade = grade,
        "Student has an unrecognized grade and was left out of grade buckets"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
