//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, TrackerError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;
    validate_controller_config(&settings.controller)?;

    if let Some(ref dir) = settings.reports.output_dir {
        if dir.trim().is_empty() {
            return Err(TrackerError::Config(
                "Report output directory cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TrackerError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(TrackerError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(TrackerError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TrackerError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TrackerError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    if config.file_name.is_empty() {
        return Err(TrackerError::Config("Log file name is required".to_string()));
    }

    Ok(())
}

fn validate_controller_config(config: &super::ControllerConfig) -> Result<()> {
    if config.fetch_timeout_seconds == 0 {
        return Err(TrackerError::Config(
            "Fetch timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
