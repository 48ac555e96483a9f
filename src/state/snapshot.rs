//! Observable list state

use std::path::PathBuf;

use serde::Serialize;

use super::query::ListQueryState;
use crate::models::{Event, EventType, GradeLevel, Prize, Student};

/// Outcome of background work the user should be told about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Notice {
    FetchFailed { message: String },
    ReportWritten { path: PathBuf },
    ReportFailed { message: String },
    WinnersWritten { path: PathBuf, empty_buckets: Vec<GradeLevel> },
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::FetchFailed { .. } | Notice::ReportFailed { .. })
    }
}

/// Student list state as presentation sees it.
///
/// Replaced as a whole on every commit; readers get a clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub prizes: Vec<Prize>,
    pub query: ListQueryState,
    pub loading: bool,
    pub exporting: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventListSnapshot {
    pub events: Vec<Event>,
    pub event_types: Vec<EventType>,
    pub search_term: String,
    pub using_search: bool,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl EventListSnapshot {
    pub fn event_type(&self, id: i32) -> Option<&EventType> {
        self.event_types.iter().find(|t| t.id == id)
    }
}
