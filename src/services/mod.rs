//! Services module
//!
//! Business logic that sits between the store and the presentation layer

pub mod event;
pub mod prize;
pub mod student;

pub use event::{validate_event, EventEditor};
pub use prize::{validate_prize, PrizeEditor};
pub use student::{validate_student, StudentEditor, MAX_NAME_LENGTH};
