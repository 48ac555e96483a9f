//! Event repository implementation

use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, EventType, UpdateEventRequest};
use crate::utils::errors::TrackerError;

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all events, most recent first
    pub async fn list(&self) -> Result<Vec<Event>, TrackerError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, name, description, event_date, location, event_type FROM load_events()",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Search events by name, location or description
    pub async fn search(&self, term: &str) -> Result<Vec<Event>, TrackerError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, name, description, event_date, location, event_type FROM event_search($1)",
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Load event type reference data
    pub async fn list_types(&self) -> Result<Vec<EventType>, TrackerError> {
        let types = sqlx::query_as::<_, EventType>(
            "SELECT id, type_name, points_awarded FROM load_types()",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, TrackerError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, description, event_date, location, event_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, event_date, location, event_type
            "#,
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.location)
        .bind(request.event_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event, leaving unset fields untouched
    pub async fn update(&self, id: i32, request: UpdateEventRequest) -> Result<Event, TrackerError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                location = COALESCE($5, location),
                event_type = COALESCE($6, event_type)
            WHERE id = $1
            RETURNING id, name, description, event_date, location, event_type
            "#,
        )
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.location)
        .bind(request.event_type)
        .fetch_optional(&self.pool)
        .await?;

        event.ok_or(TrackerError::EventNotFound { event_id: id })
    }

    /// Delete event; attendance rows cascade
    pub async fn delete(&self, id: i32) -> Result<(), TrackerError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::EventNotFound { event_id: id });
        }
        Ok(())
    }
}
