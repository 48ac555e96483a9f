//! Test database helper
//!
//! Connects to `TEST_DATABASE_URL` when it is set and otherwise starts a
//! disposable Postgres container. The schema is migrated and emptied before
//! the handle is returned.

use std::sync::Once;

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres as PostgresImage;

use participation_tracker::config::DatabaseConfig;
use participation_tracker::database::{create_pool, run_migrations, DatabasePool, DatabaseService};

static INIT: Once = Once::new();

pub struct TestDatabase {
    pub pool: DatabasePool,
    pub database_url: String,
    // Keeps the container alive for as long as the pool is used
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    pub async fn new() -> anyhow::Result<Self> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt::try_init();
        });

        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let container = PostgresImage::default()
                    .with_db_name("test_tracker")
                    .with_user("test_user")
                    .with_password("test_password")
                    .start()
                    .await?;
                let host = container.get_host().await?;
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!(
                    "postgresql://test_user:test_password@{}:{}/test_tracker",
                    host, port
                );
                (url, Some(container))
            }
        };

        let pool = create_pool(&DatabaseConfig {
            url: database_url.clone(),
            max_connections: 2,
            min_connections: 1,
            acquire_timeout_seconds: 30,
        })
        .await?;
        run_migrations(&pool).await?;

        let db = Self {
            pool,
            database_url,
            _container: container,
        };
        db.cleanup().await?;
        Ok(db)
    }

    pub fn service(&self) -> DatabaseService {
        DatabaseService::new(self.pool.clone())
    }

    /// Remove every row and reset the id sequences
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "TRUNCATE attendance, events, event_types, prizes, students RESTART IDENTITY CASCADE",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert an event type worth `points` and return its id
    pub async fn seed_event_type(&self, points: i32) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO event_types (type_name, points_awarded) VALUES ($1, $2) RETURNING id",
        )
        .bind(format!("Type {}", points))
        .bind(points)
        .fetch_one(&self.pool)
        .await
    }

    /// Insert an event of a fresh type worth `points` and return its id
    pub async fn seed_event(&self, points: i32) -> Result<i32, sqlx::Error> {
        let type_id = self.seed_event_type(points).await?;

        sqlx::query_scalar(
            "INSERT INTO events (name, event_date, location, event_type) VALUES ('Game', CURRENT_DATE, 'Gym', $1) RETURNING id",
        )
        .bind(type_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
    }
}
