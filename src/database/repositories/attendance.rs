//! Attendance repository implementation

use sqlx::PgPool;

use crate::models::{Attendance, Student};
use crate::utils::errors::TrackerError;

#[derive(Clone, Debug)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Events a student attended
    pub async fn for_student(&self, student_id: i32) -> Result<Vec<Attendance>, TrackerError> {
        let rows = sqlx::query_as::<_, Attendance>(
            "SELECT event_id, student_id FROM load_attended_events($1)",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Record a single attendance; re-recording is a no-op
    pub async fn add(&self, attendance: Attendance) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO attendance (event_id, student_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(attendance.event_id)
        .bind(attendance.student_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Save student fields and apply an attendance diff in one transaction
    pub async fn update_student_and_attendance(
        &self,
        student: &Student,
        remove: &[i32],
        add: &[i32],
    ) -> Result<(), TrackerError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE students
            SET first_name = $2, last_name = $3, middle_initial = $4, grade = $5
            WHERE id = $1
            "#,
        )
        .bind(student.id)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.middle_initial)
        .bind(student.grade)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(TrackerError::StudentNotFound {
                student_id: student.id,
            });
        }

        if !remove.is_empty() {
            sqlx::query("DELETE FROM attendance WHERE student_id = $1 AND event_id = ANY($2)")
                .bind(student.id)
                .bind(remove)
                .execute(&mut *tx)
                .await?;
        }

        if !add.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO attendance (event_id, student_id)
                SELECT event_id, $1 FROM UNNEST($2::INTEGER[]) AS event_id
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(student.id)
            .bind(add)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
