//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use repositories::{AttendanceRepository, EventRepository, PrizeRepository, StudentRepository};
pub use service::DatabaseService;
pub use store::{DataStore, EventEditStore, EventStore, PrizeEditStore, StudentEditStore};
