//! Participation Tracker
//!
//! Tracks student participation at school events: students, events,
//! attendance and prizes stored in Postgres. The library provides the
//! student and event list controllers, points reports and prize winner
//! selection, and the editing services for students, events and prizes.

pub mod config;
pub mod database;
pub mod models;
pub mod reports;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, TrackerError};

// Re-export main components for easy access
pub use database::{
    DataStore, DatabaseService, EventEditStore, EventStore, PrizeEditStore, StudentEditStore,
};
pub use services::{EventEditor, PrizeEditor, StudentEditor};
pub use state::{ControllerOptions, EventListController, Snapshot, StudentListController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
