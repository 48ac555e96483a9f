//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod attendance;
pub mod event;
pub mod prize;
pub mod student;

// Re-export commonly used models
pub use attendance::Attendance;
pub use event::{CreateEventRequest, Event, EventType, UpdateEventRequest};
pub use prize::{CreatePrizeRequest, Prize, UpdatePrizeRequest};
pub use student::{CreateStudentRequest, GradeLevel, SortKey, Student};
