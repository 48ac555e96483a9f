//! Attendance model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A student attended an event; the pair has no identity of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub event_id: i32,
    pub student_id: i32,
}
