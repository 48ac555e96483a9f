//! In-memory store double
//!
//! Serves students, prizes, events and attendance from memory. Student and
//! event fetches can be gated: a gated call waits until the test sends its
//! response, which lets tests decide the order in which reloads complete.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use participation_tracker::database::{
    DataStore, EventEditStore, EventStore, PrizeEditStore, StudentEditStore,
};
use participation_tracker::models::{
    Attendance, CreateEventRequest, CreatePrizeRequest, Event, EventType, Prize, SortKey,
    Student, UpdateEventRequest, UpdatePrizeRequest,
};
use participation_tracker::{Result, TrackerError};

type Gate<T> = oneshot::Receiver<Result<Vec<T>>>;

/// A recorded `update_student_and_attendance` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub student: Student,
    pub remove: Vec<i32>,
    pub add: Vec<i32>,
}

#[derive(Default)]
pub struct FakeStore {
    students: Mutex<Vec<Student>>,
    prizes: Mutex<Vec<Prize>>,
    events: Mutex<Vec<Event>>,
    event_types: Mutex<Vec<EventType>>,
    attendance: Mutex<Vec<Attendance>>,
    student_gates: Mutex<VecDeque<Gate<Student>>>,
    event_gates: Mutex<VecDeque<Gate<Event>>>,
    calls: Mutex<Vec<String>>,
    updates: Mutex<Vec<RecordedUpdate>>,
}

impl FakeStore {
    pub fn new(students: Vec<Student>, prizes: Vec<Prize>) -> Self {
        let store = Self::default();
        *store.students.lock().unwrap() = students;
        *store.prizes.lock().unwrap() = prizes;
        store
    }

    pub fn with_events(self, events: Vec<Event>, event_types: Vec<EventType>) -> Self {
        *self.events.lock().unwrap() = events;
        *self.event_types.lock().unwrap() = event_types;
        self
    }

    pub fn with_attendance(self, attendance: Vec<Attendance>) -> Self {
        *self.attendance.lock().unwrap() = attendance;
        self
    }

    /// The next student fetch waits for the value sent on the returned sender
    pub fn gate_students(&self) -> oneshot::Sender<Result<Vec<Student>>> {
        let (tx, rx) = oneshot::channel();
        self.student_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn gate_events(&self) -> oneshot::Sender<Result<Vec<Event>>> {
        let (tx, rx) = oneshot::channel();
        self.event_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn set_students(&self, students: Vec<Student>) {
        *self.students.lock().unwrap() = students;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn prizes(&self) -> Vec<Prize> {
        self.prizes.lock().unwrap().clone()
    }

    pub fn student_ids(&self) -> Vec<i32> {
        self.students.lock().unwrap().iter().map(|s| s.id).collect()
    }

    pub fn attended_by(&self, student_id: i32) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.student_id == student_id)
            .map(|a| a.event_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn students_or_gate(&self, fallback: Vec<Student>) -> Result<Vec<Student>> {
        let gate = self.student_gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(TrackerError::remote("gate", "sender dropped"))),
            None => Ok(fallback),
        }
    }

    async fn events_or_gate(&self, fallback: Vec<Event>) -> Result<Vec<Event>> {
        let gate = self.event_gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(TrackerError::remote("gate", "sender dropped"))),
            None => Ok(fallback),
        }
    }
}

fn sorted(mut students: Vec<Student>, order: SortKey) -> Vec<Student> {
    match order {
        SortKey::Alphabetical => students.sort_by(|a, b| a.last_name.cmp(&b.last_name)),
        SortKey::Points => students.sort_by(|a, b| b.points.cmp(&a.points)),
        SortKey::Grade => students.sort_by_key(|s| s.grade),
    }
    students
}

#[async_trait]
impl DataStore for FakeStore {
    async fn list_students(&self, order: SortKey) -> Result<Vec<Student>> {
        self.record(format!("list:{}", order.label()));
        let students = sorted(self.students.lock().unwrap().clone(), order);
        self.students_or_gate(students).await
    }

    async fn search_students(&self, term: &str, order: SortKey) -> Result<Vec<Student>> {
        self.record(format!("search:{}:{}", term, order.label()));
        let needle = term.to_lowercase();
        let matching = self
            .students
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.first_name.to_lowercase().contains(&needle)
                    || s.last_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        let students = sorted(matching, order);
        self.students_or_gate(students).await
    }

    async fn list_prizes(&self) -> Result<Vec<Prize>> {
        Ok(self.prizes.lock().unwrap().clone())
    }
}

#[async_trait]
impl EventStore for FakeStore {
    async fn list_events(&self) -> Result<Vec<Event>> {
        self.record("events".to_string());
        let events = self.events.lock().unwrap().clone();
        self.events_or_gate(events).await
    }

    async fn search_events(&self, term: &str) -> Result<Vec<Event>> {
        self.record(format!("events:{}", term));
        let needle = term.to_lowercase();
        let events = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        self.events_or_gate(events).await
    }

    async fn list_event_types(&self) -> Result<Vec<EventType>> {
        Ok(self.event_types.lock().unwrap().clone())
    }
}

#[async_trait]
impl StudentEditStore for FakeStore {
    async fn attended_events(&self, student_id: i32) -> Result<Vec<Attendance>> {
        Ok(self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.student_id == student_id)
            .copied()
            .collect())
    }

    async fn update_student_and_attendance(
        &self,
        student: &Student,
        remove: &[i32],
        add: &[i32],
    ) -> Result<()> {
        {
            let mut students = self.students.lock().unwrap();
            let existing = students
                .iter_mut()
                .find(|s| s.id == student.id)
                .ok_or(TrackerError::StudentNotFound {
                    student_id: student.id,
                })?;
            *existing = student.clone();
        }

        {
            let mut attendance = self.attendance.lock().unwrap();
            attendance.retain(|a| !(a.student_id == student.id && remove.contains(&a.event_id)));
            for &event_id in add {
                let row = Attendance {
                    event_id,
                    student_id: student.id,
                };
                if !attendance.contains(&row) {
                    attendance.push(row);
                }
            }
        }

        self.updates.lock().unwrap().push(RecordedUpdate {
            student: student.clone(),
            remove: remove.to_vec(),
            add: add.to_vec(),
        });
        Ok(())
    }

    async fn delete_student(&self, student_id: i32) -> Result<()> {
        let mut students = self.students.lock().unwrap();
        let before = students.len();
        students.retain(|s| s.id != student_id);
        if students.len() == before {
            return Err(TrackerError::StudentNotFound { student_id });
        }
        self.attendance
            .lock()
            .unwrap()
            .retain(|a| a.student_id != student_id);
        Ok(())
    }
}

#[async_trait]
impl EventEditStore for FakeStore {
    async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        self.record(format!("create_event:{}", request.name));
        let mut events = self.events.lock().unwrap();
        let event = Event {
            id: events.iter().map(|e| e.id).max().unwrap_or(0) + 1,
            name: request.name,
            description: request.description,
            event_date: request.event_date,
            location: request.location,
            event_type: request.event_type,
        };
        events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, event_id: i32, request: UpdateEventRequest) -> Result<Event> {
        self.record(format!("update_event:{}", event_id));
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or(TrackerError::EventNotFound { event_id })?;
        if let Some(name) = request.name {
            event.name = name;
        }
        if let Some(description) = request.description {
            event.description = description;
        }
        if let Some(event_date) = request.event_date {
            event.event_date = event_date;
        }
        if let Some(location) = request.location {
            event.location = location;
        }
        if let Some(event_type) = request.event_type {
            event.event_type = event_type;
        }
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: i32) -> Result<()> {
        self.record(format!("delete_event:{}", event_id));
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(TrackerError::EventNotFound { event_id });
        }
        self.attendance
            .lock()
            .unwrap()
            .retain(|a| a.event_id != event_id);
        Ok(())
    }
}

#[async_trait]
impl PrizeEditStore for FakeStore {
    async fn create_prize(&self, request: CreatePrizeRequest) -> Result<Prize> {
        self.record(format!("create_prize:{}", request.name));
        let mut prizes = self.prizes.lock().unwrap();
        let prize = Prize {
            id: prizes.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            name: request.name,
            min_points: request.min_points,
            prize_type: request.prize_type,
        };
        prizes.push(prize.clone());
        Ok(prize)
    }

    async fn update_prize(&self, prize_id: i32, request: UpdatePrizeRequest) -> Result<Prize> {
        self.record(format!("update_prize:{}", prize_id));
        let mut prizes = self.prizes.lock().unwrap();
        let prize = prizes
            .iter_mut()
            .find(|p| p.id == prize_id)
            .ok_or(TrackerError::PrizeNotFound { prize_id })?;
        if let Some(name) = request.name {
            prize.name = name;
        }
        if let Some(min_points) = request.min_points {
            prize.min_points = min_points;
        }
        if let Some(prize_type) = request.prize_type {
            prize.prize_type = prize_type;
        }
        Ok(prize.clone())
    }

    async fn delete_prize(&self, prize_id: i32) -> Result<()> {
        self.record(format!("delete_prize:{}", prize_id));
        let mut prizes = self.prizes.lock().unwrap();
        let before = prizes.len();
        prizes.retain(|p| p.id != prize_id);
        if prizes.len() == before {
            return Err(TrackerError::PrizeNotFound { prize_id });
        }
        Ok(())
    }
}
