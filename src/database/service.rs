//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    AttendanceRepository, DatabasePool, EventRepository, PrizeRepository, StudentRepository,
};
use crate::models::*;
use crate::utils::errors::TrackerError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub students: StudentRepository,
    pub events: EventRepository,
    pub attendance: AttendanceRepository,
    pub prizes: PrizeRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            students: StudentRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            prizes: PrizeRepository::new(pool),
        }
    }

    /// Register a new student and return them with their (zero) points
    pub async fn register_student(&self, request: CreateStudentRequest) -> Result<Student, TrackerError> {
        if GradeLevel::try_from(request.grade).is_err() {
            return Err(TrackerError::InvalidInput(format!(
                "Grade must be between 9 and 12, got {}",
                request.grade
            )));
        }

        let id = self.students.create(request).await?;
        self.students
            .find_by_id(id)
            .await?
            .ok_or(TrackerError::StudentNotFound { student_id: id })
    }

    /// Mark a student as having attended an event
    pub async fn record_attendance(&self, event_id: i32, student_id: i32) -> Result<(), TrackerError> {
        if self.students.find_by_id(student_id).await?.is_none() {
            return Err(TrackerError::StudentNotFound { student_id });
        }

        self.attendance
            .add(Attendance {
                event_id,
                student_id,
            })
            .await
    }

    /// Get system statistics
    pub async fn get_system_stats(&self) -> Result<serde_json::Value, TrackerError> {
        let (students, events, prizes) = futures::try_join!(
            self.students.count(),
            self.events.list(),
            self.prizes.list(),
        )?;

        Ok(serde_json::json!({
            "students": students,
            "events": events.len(),
            "prizes": prizes.len(),
        }))
    }
}
