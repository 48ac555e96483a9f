//! Prize model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Prize {
    pub id: i32,
    pub name: String,
    /// Minimum points a student needs to qualify
    pub min_points: i32,
    pub prize_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrizeRequest {
    pub name: String,
    pub min_points: i32,
    pub prize_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePrizeRequest {
    pub name: Option<String>,
    pub min_points: Option<i32>,
    pub prize_type: Option<String>,
}

impl UpdatePrizeRequest {
    /// Only the fields of `edited` that differ from `saved`
    pub fn changes(saved: &Prize, edited: &CreatePrizeRequest) -> Self {
        Self {
            name: (saved.name != edited.name).then(|| edited.name.clone()),
            min_points: (saved.min_points != edited.min_points).then_some(edited.min_points),
            prize_type: (saved.prize_type != edited.prize_type).then(|| edited.prize_type.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_points.is_none() && self.prize_type.is_none()
    }
}
