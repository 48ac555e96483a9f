//! Event and event type models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{Result, TrackerError};
use crate::utils::helpers::{format_date_input, format_display_date, parse_display_date};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub location: String,
    pub event_type: i32,
}

/// Static reference data describing how many points attending awards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EventType {
    pub id: i32,
    pub type_name: String,
    pub points_awarded: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub location: String,
    pub event_type: i32,
}

impl Event {
    /// `dd/mm/yyyy`, as event forms show it
    pub fn display_date(&self) -> String {
        format_display_date(self.event_date)
    }
}

impl CreateEventRequest {
    /// Build a request from event form input.
    ///
    /// `date_input` is masked like the date field (`ddmmyyyy` keystrokes are
    /// accepted) and must resolve to a full calendar date.
    pub fn from_form(
        name: &str,
        description: &str,
        date_input: &str,
        location: &str,
        event_type: i32,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(TrackerError::InvalidInput("Event name is required".to_string()));
        }

        let masked = format_date_input(date_input);
        let event_date = parse_display_date(&masked).ok_or_else(|| {
            TrackerError::InvalidInput(format!("'{}' is not a complete date", date_input))
        })?;

        Ok(Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            event_date,
            location: location.trim().to_string(),
            event_type,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub event_type: Option<i32>,
}

impl UpdateEventRequest {
    /// Only the fields of `edited` that differ from `saved`
    pub fn changes(saved: &Event, edited: &CreateEventRequest) -> Self {
        Self {
            name: (saved.name != edited.name).then(|| edited.name.clone()),
            description: (saved.description != edited.description)
                .then(|| edited.description.clone()),
            event_date: (saved.event_date != edited.event_date).then_some(edited.event_date),
            location: (saved.location != edited.location).then(|| edited.location.clone()),
            event_type: (saved.event_type != edited.event_type).then_some(edited.event_type),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.event_date.is_none()
            && self.location.is_none()
            && self.event_type.is_none()
    }
}
