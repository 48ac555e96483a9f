//! Store capabilities the controllers depend on
//!
//! Controllers only see these traits, so tests can swap the Postgres-backed
//! [`DatabaseService`] for an in-memory double.

use async_trait::async_trait;

use crate::database::DatabaseService;
use crate::models::{
    Attendance, CreateEventRequest, CreatePrizeRequest, Event, EventType, Prize, SortKey,
    Student, UpdateEventRequest, UpdatePrizeRequest,
};
use crate::utils::errors::{Result, TrackerError};

/// Read access to students and prizes
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn list_students(&self, order: SortKey) -> Result<Vec<Student>>;

    async fn search_students(&self, term: &str, order: SortKey) -> Result<Vec<Student>>;

    async fn list_prizes(&self) -> Result<Vec<Prize>>;
}

/// Read access to events and event types
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>>;

    async fn search_events(&self, term: &str) -> Result<Vec<Event>>;

    async fn list_event_types(&self) -> Result<Vec<EventType>>;
}

/// Mutations behind the student details view
#[async_trait]
pub trait StudentEditStore: Send + Sync {
    async fn attended_events(&self, student_id: i32) -> Result<Vec<Attendance>>;

    async fn update_student_and_attendance(
        &self,
        student: &Student,
        remove: &[i32],
        add: &[i32],
    ) -> Result<()>;

    async fn delete_student(&self, student_id: i32) -> Result<()>;
}

/// Mutations behind the event forms
#[async_trait]
pub trait EventEditStore: Send + Sync {
    async fn create_event(&self, request: CreateEventRequest) -> Result<Event>;

    async fn update_event(&self, event_id: i32, request: UpdateEventRequest) -> Result<Event>;

    async fn delete_event(&self, event_id: i32) -> Result<()>;
}

/// Mutations behind the prize forms
#[async_trait]
pub trait PrizeEditStore: Send + Sync {
    async fn create_prize(&self, request: CreatePrizeRequest) -> Result<Prize>;

    async fn update_prize(&self, prize_id: i32, request: UpdatePrizeRequest) -> Result<Prize>;

    async fn delete_prize(&self, prize_id: i32) -> Result<()>;
}

/// Database failures become fetch failures; everything else passes through.
fn fetch_error(operation: &'static str, error: TrackerError) -> TrackerError {
    match error {
        TrackerError::Database(e) => TrackerError::remote(operation, e),
        other => other,
    }
}

#[async_trait]
impl DataStore for DatabaseService {
    async fn list_students(&self, order: SortKey) -> Result<Vec<Student>> {
        self.students
            .list(order)
            .await
            .map_err(|e| fetch_error("list_students", e))
    }

    async fn search_students(&self, term: &str, order: SortKey) -> Result<Vec<Student>> {
        self.students
            .search(term, order)
            .await
            .map_err(|e| fetch_error("search_students", e))
    }

    async fn list_prizes(&self) -> Result<Vec<Prize>> {
        self.prizes
            .list()
            .await
            .map_err(|e| fetch_error("list_prizes", e))
    }
}

#[async_trait]
impl EventStore for DatabaseService {
    async fn list_events(&self) -> Result<Vec<Event>> {
        self.events
            .list()
            .await
            .map_err(|e| fetch_error("list_events", e))
    }

    async fn search_events(&self, term: &str) -> Result<Vec<Event>> {
        self.events
            .search(term)
            .await
            .map_err(|e| fetch_error("search_events", e))
    }

    async fn list_event_types(&self) -> Result<Vec<EventType>> {
        self.events
            .list_types()
            .await
            .map_err(|e| fetch_error("list_event_types", e))
    }
}

#[async_trait]
impl StudentEditStore for DatabaseService {
    async fn attended_events(&self, student_id: i32) -> Result<Vec<Attendance>> {
        self.attendance
            .for_student(student_id)
            .await
            .map_err(|e| fetch_error("attended_events", e))
    }

    async fn update_student_and_attendance(
        &self,
        student: &Student,
        remove: &[i32],
        add: &[i32],
    ) -> Result<()> {
        self.attendance
            .update_student_and_attendance(student, remove, add)
            .await
    }

    async fn delete_student(&self, student_id: i32) -> Result<()> {
        self.students.delete(student_id).await
    }
}

#[async_trait]
impl EventEditStore for DatabaseService {
    async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        self.events.create(request).await
    }

    async fn update_event(&self, event_id: i32, request: UpdateEventRequest) -> Result<Event> {
        self.events.update(event_id, request).await
    }

    async fn delete_event(&self, event_id: i32) -> Result<()> {
        self.events.delete(event_id).await
    }
}

#[async_trait]
impl PrizeEditStore for DatabaseService {
    async fn create_prize(&self, request: CreatePrizeRequest) -> Result<Prize> {
        self.prizes.create(request).await
    }

    async fn update_prize(&self, prize_id: i32, request: UpdatePrizeRequest) -> Result<Prize> {
        self.prizes.update(prize_id, request).await
    }

    async fn delete_prize(&self, prize_id: i32) -> Result<()> {
        self.prizes.delete(prize_id).await
    }
}
