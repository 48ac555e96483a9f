//! Prize repository implementation

use sqlx::PgPool;

use crate::models::prize::{CreatePrizeRequest, Prize, UpdatePrizeRequest};
use crate::utils::errors::TrackerError;

#[derive(Clone, Debug)]
pub struct PrizeRepository {
    pool: PgPool,
}

impl PrizeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all prizes ordered by threshold
    pub async fn list(&self) -> Result<Vec<Prize>, TrackerError> {
        let prizes = sqlx::query_as::<_, Prize>(
            "SELECT id, name, min_points, prize_type FROM load_prizes()",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(prizes)
    }

    pub async fn create(&self, request: CreatePrizeRequest) -> Result<Prize, TrackerError> {
        if request.min_points < 0 {
            return Err(TrackerError::InvalidInput(
                "Prize threshold cannot be negative".to_string(),
            ));
        }

        let prize = sqlx::query_as::<_, Prize>(
            r#"
            INSERT INTO prizes (name, min_points, prize_type)
            VALUES ($1, $2, $3)
            RETURNING id, name, min_points, prize_type
            "#,
        )
        .bind(request.name)
        .bind(request.min_points)
        .bind(request.prize_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(prize)
    }

    pub async fn update(&self, id: i32, request: UpdatePrizeRequest) -> Result<Prize, TrackerError> {
        if request.min_points.is_some_and(|points| points < 0) {
            return Err(TrackerError::InvalidInput(
                "Prize threshold cannot be negative".to_string(),
            ));
        }

        let prize = sqlx::query_as::<_, Prize>(
            r#"
            UPDATE prizes
            SET name = COALESCE($2, name),
                min_points = COALESCE($3, min_points),
                prize_type = COALESCE($4, prize_type)
            WHERE id = $1
            RETURNING id, name, min_points, prize_type
            "#,
        )
        .bind(id)
        .bind(request.name)
        .bind(request.min_points)
        .bind(request.prize_type)
        .fetch_optional(&self.pool)
        .await?;

        prize.ok_or(TrackerError::PrizeNotFound { prize_id: id })
    }

    pub async fn delete(&self, id: i32) -> Result<(), TrackerError> {
        let result = sqlx::query("DELETE FROM prizes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::PrizeNotFound { prize_id: id });
        }
        Ok(())
    }
}
