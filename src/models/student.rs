//! Student model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_initial: String,
    pub grade: i32,
    /// Aggregated server-side from attendance; never recomputed locally.
    pub points: i32,
}

impl Student {
    /// Name as it appears in CSV reports: `last first [mi]`
    pub fn report_name(&self) -> String {
        let mut name = format!("{} {}", self.last_name, self.first_name);
        if !self.middle_initial.is_empty() {
            name.push(' ');
            name.push_str(&self.middle_initial);
        }
        name
    }

    /// Name as it appears in list views: `last, first [mi]`
    pub fn display_name(&self) -> String {
        let mut name = format!("{}, {}", self.last_name, self.first_name);
        if !self.middle_initial.is_empty() {
            name.push(' ');
            name.push_str(&self.middle_initial);
        }
        name
    }

    pub fn grade_level(&self) -> Option<GradeLevel> {
        GradeLevel::try_from(self.grade).ok()
    }
}

/// The four tracked grade levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLevel {
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 4] = [
        GradeLevel::Ninth,
        GradeLevel::Tenth,
        GradeLevel::Eleventh,
        GradeLevel::Twelfth,
    ];

    pub fn number(self) -> i32 {
        match self {
            GradeLevel::Ninth => 9,
            GradeLevel::Tenth => 10,
            GradeLevel::Eleventh => 11,
            GradeLevel::Twelfth => 12,
        }
    }

    /// Position in `ALL`
    pub fn index(self) -> usize {
        (self.number() - 9) as usize
    }
}

impl TryFrom<i32> for GradeLevel {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            9 => Ok(GradeLevel::Ninth),
            10 => Ok(GradeLevel::Tenth),
            11 => Ok(GradeLevel::Eleventh),
            12 => Ok(GradeLevel::Twelfth),
            other => Err(other),
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Ordering requested from the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Alphabetical,
    Points,
    /// Used by the points report only
    Grade,
}

impl SortKey {
    /// Column name the store functions expect for `order_by`
    pub fn as_order_by(self) -> &'static str {
        match self {
            SortKey::Alphabetical => "last_name",
            SortKey::Points => "points",
            SortKey::Grade => "grade",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Alphabetical => "Alphabetical",
            SortKey::Points => "Points",
            SortKey::Grade => "Grade",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub middle_initial: String,
    pub grade: i32,
}
