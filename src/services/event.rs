//! Event editing service
//!
//! One editor backs both the new-event form and the details form of a
//! saved event. The date is kept as typed, masked to `dd/mm/yyyy`, and only
//! parsed when the draft is turned into a request.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::EventEditStore;
use crate::models::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::{Result, TrackerError};
use crate::utils::helpers::format_date_input;

pub const MAX_EVENT_NAME_LENGTH: usize = 24;
pub const MAX_DESCRIPTION_LENGTH: usize = 199;
pub const MAX_LOCATION_LENGTH: usize = 49;

pub struct EventEditor {
    store: Arc<dyn EventEditStore>,
    saved: Option<Event>,
    name: String,
    description: String,
    date_input: String,
    location: String,
    event_type: i32,
}

impl EventEditor {
    /// Blank form for a new event of `event_type`
    pub fn new(store: Arc<dyn EventEditStore>, event_type: i32) -> Self {
        Self {
            store,
            saved: None,
            name: String::new(),
            description: String::new(),
            date_input: String::new(),
            location: String::new(),
            event_type,
        }
    }

    /// Form over a saved event
    pub fn edit(store: Arc<dyn EventEditStore>, event: Event) -> Self {
        let mut editor = Self::new(store, event.event_type);
        editor.load(event);
        editor
    }

    fn load(&mut self, event: Event) {
        self.name = event.name.clone();
        self.description = event.description.clone();
        self.date_input = event.display_date();
        self.location = event.location.clone();
        self.event_type = event.event_type;
        self.saved = Some(event);
    }

    pub fn saved(&self) -> Option<&Event> {
        self.saved.as_ref()
    }

    pub fn is_new(&self) -> bool {
        self.saved.is_none()
    }

    pub fn date_input(&self) -> &str {
        &self.date_input
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    /// Accepts raw keystrokes; the stored value is always masked
    pub fn set_date(&mut self, raw: &str) {
        self.date_input = format_date_input(raw);
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    pub fn set_event_type(&mut self, event_type: i32) {
        self.event_type = event_type;
    }

    /// Validated request for the current draft
    pub fn request(&self) -> Result<CreateEventRequest> {
        let request = CreateEventRequest::from_form(
            &self.name,
            &self.description,
            &self.date_input,
            &self.location,
            self.event_type,
        )?;
        validate_event(&request)?;
        Ok(request)
    }

    /// Insert the draft, or write the edited fields of a saved event.
    ///
    /// Saving an unmodified saved event makes no store call.
    pub async fn save(&mut self) -> Result<Event> {
        let request = self.request()?;

        let event = match &self.saved {
            Some(saved) => {
                let changes = UpdateEventRequest::changes(saved, &request);
                if changes.is_empty() {
                    debug!(event_id = saved.id, "No event changes to save");
                    return Ok(saved.clone());
                }
                self.store.update_event(saved.id, changes).await?
            }
            None => self.store.create_event(request).await?,
        };

        info!(event_id = event.id, name = %event.name, "Event saved");
        self.load(event.clone());
        Ok(event)
    }

    pub async fn delete_event(self) -> Result<()> {
        let Some(saved) = self.saved else {
            return Err(TrackerError::InvalidInput(
                "Event has not been saved yet".to_string(),
            ));
        };

        self.store.delete_event(saved.id).await?;
        info!(event_id = saved.id, "Event deleted");
        Ok(())
    }
}

/// Field rules for an event about to be written
pub fn validate_event(request: &CreateEventRequest) -> Result<()> {
    let limits = [
        ("Event name", &request.name, MAX_EVENT_NAME_LENGTH),
        ("Description", &request.description, MAX_DESCRIPTION_LENGTH),
        ("Location", &request.location, MAX_LOCATION_LENGTH),
    ];
    for (label, value, max) in limits {
        if value.chars().count() > max {
            return Err(TrackerError::InvalidInput(format!(
                "{} must be at most {} characters",
                label, max
            )));
        }
    }

    if request.location.trim().is_empty() {
        return Err(TrackerError::InvalidInput("Location is required".to_string()));
    }

    Ok(())
}
