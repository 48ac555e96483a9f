//! Prize editing service

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::PrizeEditStore;
use crate::models::{CreatePrizeRequest, Prize, UpdatePrizeRequest};
use crate::utils::errors::{Result, TrackerError};
use crate::utils::helpers::normalize_whitespace;

pub const MAX_PRIZE_NAME_LENGTH: usize = 29;

/// Category a new prize starts with
pub const DEFAULT_PRIZE_TYPE: &str = "School Reward";

pub struct PrizeEditor {
    store: Arc<dyn PrizeEditStore>,
    saved: Option<Prize>,
    draft: CreatePrizeRequest,
}

impl PrizeEditor {
    pub fn new(store: Arc<dyn PrizeEditStore>) -> Self {
        Self {
            store,
            saved: None,
            draft: CreatePrizeRequest {
                name: String::new(),
                min_points: 0,
                prize_type: DEFAULT_PRIZE_TYPE.to_string(),
            },
        }
    }

    pub fn edit(store: Arc<dyn PrizeEditStore>, prize: Prize) -> Self {
        let mut editor = Self::new(store);
        editor.load(prize);
        editor
    }

    fn load(&mut self, prize: Prize) {
        self.draft = CreatePrizeRequest {
            name: prize.name.clone(),
            min_points: prize.min_points,
            prize_type: prize.prize_type.clone(),
        };
        self.saved = Some(prize);
    }

    pub fn saved(&self) -> Option<&Prize> {
        self.saved.as_ref()
    }

    pub fn draft(&self) -> &CreatePrizeRequest {
        &self.draft
    }

    pub fn set_name(&mut self, name: &str) {
        self.draft.name = normalize_whitespace(name);
    }

    pub fn set_min_points(&mut self, min_points: i32) {
        self.draft.min_points = min_points;
    }

    /// Parse the threshold field; the draft keeps its old value on error.
    pub fn set_min_points_input(&mut self, text: &str) -> Result<()> {
        let points = text.trim().parse::<i32>().map_err(|_| {
            TrackerError::InvalidInput(format!("'{}' is not a whole number of points", text))
        })?;
        self.draft.min_points = points;
        Ok(())
    }

    pub fn set_prize_type(&mut self, prize_type: &str) {
        self.draft.prize_type = prize_type.trim().to_string();
    }

    pub fn has_changes(&self) -> bool {
        match &self.saved {
            Some(saved) => !UpdatePrizeRequest::changes(saved, &self.draft).is_empty(),
            None => true,
        }
    }

    pub async fn save(&mut self) -> Result<Prize> {
        validate_prize(&self.draft)?;

        let prize = match &self.saved {
            Some(saved) => {
                let changes = UpdatePrizeRequest::changes(saved, &self.draft);
                if changes.is_empty() {
                    debug!(prize_id = saved.id, "No prize changes to save");
                    return Ok(saved.clone());
                }
                self.store.update_prize(saved.id, changes).await?
            }
            None => self.store.create_prize(self.draft.clone()).await?,
        };

        info!(
            prize_id = prize.id,
            min_points = prize.min_points,
            "Prize saved"
        );
        self.load(prize.clone());
        Ok(prize)
    }

    pub async fn delete_prize(self) -> Result<()> {
        let Some(saved) = self.saved else {
            return Err(TrackerError::InvalidInput(
                "Prize has not been saved yet".to_string(),
            ));
        };

        self.store.delete_prize(saved.id).await?;
        info!(prize_id = saved.id, "Prize deleted");
        Ok(())
    }
}

pub fn validate_prize(request: &CreatePrizeRequest) -> Result<()> {
    if request.name.trim().is_empty() {
        return Err(TrackerError::InvalidInput("Prize name is required".to_string()));
    }
    if request.name.chars().count() > MAX_PRIZE_NAME_LENGTH {
        return Err(TrackerError::InvalidInput(format!(
            "Prize name must be at most {} characters",
            MAX_PRIZE_NAME_LENGTH
        )));
    }
    if request.min_points < 0 {
        return Err(TrackerError::InvalidInput(
            "Prize threshold cannot be negative".to_string(),
        ));
    }
    if request.prize_type.is_empty() {
        return Err(TrackerError::InvalidInput("Prize type is required".to_string()));
    }
    Ok(())
}
