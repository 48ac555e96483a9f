//! Student repository implementation

use sqlx::PgPool;
use std::time::Instant;

use crate::models::student::{CreateStudentRequest, SortKey, Student};
use crate::utils::errors::TrackerError;
use crate::utils::logging::log_database_operation;

#[derive(Clone, Debug)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all students with their aggregated points
    pub async fn list(&self, order: SortKey) -> Result<Vec<Student>, TrackerError> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, middle_initial, grade, points FROM load_students($1)",
        )
        .bind(order.as_order_by())
        .fetch_all(&self.pool)
        .await;

        log_database_operation(
            "load_students",
            "students",
            started.elapsed().as_millis() as u64,
            result.is_ok(),
        );
        Ok(result?)
    }

    /// Search students by name or grade
    pub async fn search(&self, term: &str, order: SortKey) -> Result<Vec<Student>, TrackerError> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, middle_initial, grade, points FROM student_search($1, $2)",
        )
        .bind(term)
        .bind(order.as_order_by())
        .fetch_all(&self.pool)
        .await;

        log_database_operation(
            "student_search",
            "students",
            started.elapsed().as_millis() as u64,
            result.is_ok(),
        );
        Ok(result?)
    }

    /// Find student by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Student>, TrackerError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, middle_initial, grade, points FROM student_points WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Create a new student
    pub async fn create(&self, request: CreateStudentRequest) -> Result<i32, TrackerError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO students (first_name, last_name, middle_initial, grade)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.middle_initial)
        .bind(request.grade)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Delete student; attendance rows cascade
    pub async fn delete(&self, id: i32) -> Result<(), TrackerError> {
        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count total students
    pub async fn count(&self) -> Result<i64, TrackerError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
