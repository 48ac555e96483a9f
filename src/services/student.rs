//! Student editing service
//!
//! Holds a draft of one student's fields plus the pending attendance
//! changes, validates the draft and persists both in one store call.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::database::StudentEditStore;
use crate::models::{GradeLevel, Student};
use crate::utils::errors::{Result, TrackerError};
use crate::utils::helpers::normalize_whitespace;

/// Longest accepted first or last name, in characters
pub const MAX_NAME_LENGTH: usize = 19;

pub struct StudentEditor {
    store: Arc<dyn StudentEditStore>,
    saved: Student,
    draft: Student,
    attended: BTreeSet<i32>,
    pending_add: BTreeSet<i32>,
    pending_remove: BTreeSet<i32>,
}

impl StudentEditor {
    /// Start editing `student`, loading the events they attended
    pub async fn load(store: Arc<dyn StudentEditStore>, student: Student) -> Result<Self> {
        let attended = store
            .attended_events(student.id)
            .await?
            .into_iter()
            .map(|attendance| attendance.event_id)
            .collect();

        debug!(student_id = student.id, "Student editor loaded");

        Ok(Self {
            store,
            saved: student.clone(),
            draft: student,
            attended,
            pending_add: BTreeSet::new(),
            pending_remove: BTreeSet::new(),
        })
    }

    pub fn student(&self) -> &Student {
        &self.draft
    }

    pub fn pending_additions(&self) -> &BTreeSet<i32> {
        &self.pending_add
    }

    pub fn pending_removals(&self) -> &BTreeSet<i32> {
        &self.pending_remove
    }

    /// Attendance as it will be after saving
    pub fn is_attending(&self, event_id: i32) -> bool {
        self.pending_add.contains(&event_id)
            || (self.attended.contains(&event_id) && !self.pending_remove.contains(&event_id))
    }

    pub fn has_changes(&self) -> bool {
        self.draft != self.saved || !self.pending_add.is_empty() || !self.pending_remove.is_empty()
    }

    pub fn add_attendance(&mut self, event_id: i32) {
        self.pending_remove.remove(&event_id);
        if !self.attended.contains(&event_id) {
            self.pending_add.insert(event_id);
        }
    }

    pub fn remove_attendance(&mut self, event_id: i32) {
        self.pending_add.remove(&event_id);
        if self.attended.contains(&event_id) {
            self.pending_remove.insert(event_id);
        }
    }

    /// Drop any pending change for `event_id`
    pub fn revert_attendance(&mut self, event_id: i32) {
        self.pending_add.remove(&event_id);
        self.pending_remove.remove(&event_id);
    }

    pub fn set_first_name(&mut self, first_name: &str) {
        self.draft.first_name = normalize_whitespace(first_name);
    }

    pub fn set_last_name(&mut self, last_name: &str) {
        self.draft.last_name = normalize_whitespace(last_name);
    }

    pub fn set_middle_initial(&mut self, middle_initial: &str) {
        self.draft.middle_initial = middle_initial.trim().to_string();
    }

    pub fn set_grade(&mut self, grade: GradeLevel) {
        self.draft.grade = grade.number();
    }

    pub fn validate(&self) -> Result<()> {
        validate_student(&self.draft)
    }

    /// Persist the draft and the attendance diff, then clear pending edits
    pub async fn save_changes(&mut self) -> Result<()> {
        self.validate()?;

        let remove: Vec<i32> = self.pending_remove.iter().copied().collect();
        let add: Vec<i32> = self.pending_add.iter().copied().collect();

        self.store
            .update_student_and_attendance(&self.draft, &remove, &add)
            .await?;

        for event_id in &remove {
            self.attended.remove(event_id);
        }
        self.attended.extend(add.iter().copied());
        self.pending_add.clear();
        self.pending_remove.clear();
        self.saved = self.draft.clone();

        info!(
            student_id = self.draft.id,
            added = add.len(),
            removed = remove.len(),
            "Student changes saved"
        );
        Ok(())
    }

    pub async fn delete_student(self) -> Result<()> {
        self.store.delete_student(self.saved.id).await?;
        info!(student_id = self.saved.id, "Student deleted");
        Ok(())
    }
}

/// Field rules for a student about to be written
pub fn validate_student(student: &Student) -> Result<()> {
    for (label, value) in [("First name", &student.first_name), ("Last name", &student.last_name)] {
        if value.trim().is_empty() {
            return Err(TrackerError::InvalidInput(format!("{} is required", label)));
        }
        if value.chars().count() > MAX_NAME_LENGTH {
            return Err(TrackerError::InvalidInput(format!(
                "{} must be at most {} characters",
                label, MAX_NAME_LENGTH
            )));
        }
    }

    if student.middle_initial.chars().count() > 1 {
        return Err(TrackerError::InvalidInput(
            "Middle initial must be a single character".to_string(),
        ));
    }

    if GradeLevel::try_from(student.grade).is_err() {
        return Err(TrackerError::InvalidInput(format!(
            "Grade must be between 9 and 12, got {}",
            student.grade
        )));
    }

    Ok(())
}
