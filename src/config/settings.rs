//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_name: String,
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportsConfig {
    /// Directory receiving generated CSV files; the user's downloads
    /// folder when unset
    pub output_dir: Option<String>,
}

/// List controller configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    pub fetch_timeout_seconds: u64,
    pub winner_seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: 15,
            winner_seed: None,
        }
    }
}

impl ControllerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

impl ReportsConfig {
    /// Resolve the directory reports are written to
    pub fn resolve_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return PathBuf::from(dir);
        }

        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join("Downloads"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections)?
            .set_default("database.min_connections", defaults.database.min_connections)?
            .set_default(
                "database.acquire_timeout_seconds",
                defaults.database.acquire_timeout_seconds,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.directory", defaults.logging.directory)?
            .set_default("logging.file_name", defaults.logging.file_name)?
            .set_default(
                "controller.fetch_timeout_seconds",
                defaults.controller.fetch_timeout_seconds,
            )?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("TRACKER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::utils::errors::Result<()> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/participation".to_string(),
                max_connections: 5,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                file_name: "participation-tracker.log".to_string(),
            },
            reports: ReportsConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_output_dir_wins() {
        let reports = ReportsConfig {
            output_dir: Some("/tmp/reports".to_string()),
        };
        assert_eq!(reports.resolve_output_dir(), PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_default_controller_timeout() {
        let settings = Settings::default();
        assert_eq!(settings.controller.fetch_timeout(), Duration::from_secs(15));
        assert!(settings.controller.winner_seed.is_none());
    }
}
