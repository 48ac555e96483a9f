//! Prize winner selection
//!
//! One winner is drawn uniformly at random from each grade bucket and one
//! overall winner is the student with the most points. Every winner is then
//! matched to the highest-threshold prize they qualify for.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use super::csv::{escape_field, CsvRecord};
use crate::models::{GradeLevel, Prize, Student};
use crate::utils::logging::{log_grade_anomaly, log_winner_selection};

/// File name prefix for winners reports
pub const WINNERS_REPORT_PREFIX: &str = "Winners";

/// Why a winner slot has no student
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionError {
    #[error("No students in grade {0}")]
    EmptyBucket(GradeLevel),

    #[error("No students to pick an overall winner from")]
    NoStudents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WinnerCategory {
    Grade(GradeLevel),
    Overall,
}

impl WinnerCategory {
    /// Report order: grades 9 to 12, then the overall winner
    pub const ALL: [WinnerCategory; 5] = [
        WinnerCategory::Grade(GradeLevel::Ninth),
        WinnerCategory::Grade(GradeLevel::Tenth),
        WinnerCategory::Grade(GradeLevel::Eleventh),
        WinnerCategory::Grade(GradeLevel::Twelfth),
        WinnerCategory::Overall,
    ];

    pub fn label(self) -> String {
        match self {
            WinnerCategory::Grade(level) => format!("Grade {} Winner", level),
            WinnerCategory::Overall => "Most Points Winner".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub student: Student,
    /// `None` when the student's points are below every threshold
    pub prize: Option<Prize>,
}

/// A student left out of grade buckets because of an unknown grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeAnomaly {
    pub student_id: i32,
    pub grade: i32,
}

pub type WinnerSlot = Result<Winner, SelectionError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinnerResult {
    /// Indexed by [`GradeLevel::index`]
    pub grade_winners: [WinnerSlot; 4],
    pub overall: WinnerSlot,
    pub anomalies: Vec<GradeAnomaly>,
}

impl WinnerResult {
    pub fn get(&self, category: WinnerCategory) -> &WinnerSlot {
        match category {
            WinnerCategory::Grade(level) => &self.grade_winners[level.index()],
            WinnerCategory::Overall => &self.overall,
        }
    }

    /// All five slots in report order
    pub fn entries(&self) -> impl Iterator<Item = (WinnerCategory, &WinnerSlot)> + '_ {
        WinnerCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn empty_buckets(&self) -> Vec<GradeLevel> {
        GradeLevel::ALL
            .into_iter()
            .filter(|level| {
                matches!(
                    self.grade_winners[level.index()],
                    Err(SelectionError::EmptyBucket(_))
                )
            })
            .collect()
    }

    pub fn to_rows(&self) -> Vec<WinnerRow> {
        self.entries()
            .map(|(category, slot)| WinnerRow::new(category, slot))
            .collect()
    }
}

/// Highest-threshold prize not exceeding `points`; first listed wins ties
pub fn best_qualifying_prize(prizes: &[Prize], points: i32) -> Option<&Prize> {
    prizes
        .iter()
        .filter(|prize| prize.min_points <= points)
        .fold(None, |best: Option<&Prize>, prize| match best {
            Some(current) if current.min_points >= prize.min_points => Some(current),
            _ => Some(prize),
        })
}

/// Student with strictly the most points; the first one wins ties
pub fn max_points_student(students: &[Student]) -> Option<&Student> {
    students.iter().fold(None, |best: Option<&Student>, student| match best {
        Some(current) if current.points >= student.points => Some(current),
        _ => Some(student),
    })
}

fn resolve(student: &Student, prizes: &[Prize]) -> Winner {
    Winner {
        student: student.clone(),
        prize: best_qualifying_prize(prizes, student.points).cloned(),
    }
}

/// Pick the five winners.
///
/// Buckets are drawn in grade order, so the same input and the same seeded
/// `rng` always produce the same result. Students with an unknown grade are
/// reported as anomalies and still compete for the overall slot.
pub fn select_winners<R: Rng + ?Sized>(
    students: &[Student],
    prizes: &[Prize],
    rng: &mut R,
) -> WinnerResult {
    let mut buckets: [Vec<&Student>; 4] = Default::default();
    let mut anomalies = Vec::new();

    for student in students {
        match student.grade_level() {
            Some(level) => buckets[level.index()].push(student),
            None => {
                log_grade_anomaly(student.id, student.grade);
                anomalies.push(GradeAnomaly {
                    student_id: student.id,
                    grade: student.grade,
                });
            }
        }
    }

    let grade_winners = GradeLevel::ALL.map(|level| {
        buckets[level.index()]
            .choose(&mut *rng)
            .map(|student| resolve(student, prizes))
            .ok_or(SelectionError::EmptyBucket(level))
    });

    let overall = max_points_student(students)
        .map(|student| resolve(student, prizes))
        .ok_or(SelectionError::NoStudents);

    let result = WinnerResult {
        grade_winners,
        overall,
        anomalies,
    };
    log_winner_selection(students.len(), prizes.len(), result.empty_buckets().len());
    result
}

/// One line of the winners report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerRow {
    pub label: String,
    pub name: String,
    pub points: Option<i32>,
    pub prize: String,
}

impl WinnerRow {
    pub fn new(category: WinnerCategory, slot: &WinnerSlot) -> Self {
        match slot {
            Ok(winner) => Self {
                label: category.label(),
                name: winner.student.report_name(),
                points: Some(winner.student.points),
                prize: winner
                    .prize
                    .as_ref()
                    .map(|prize| prize.name.clone())
                    .unwrap_or_default(),
            },
            Err(_) => Self {
                label: category.label(),
                name: String::new(),
                points: None,
                prize: String::new(),
            },
        }
    }
}

impl CsvRecord for WinnerRow {
    fn header() -> &'static str {
        "Winner,Name,Points, Prize"
    }

    fn to_line(&self) -> String {
        format!(
            "{},{}, {}, {}",
            self.label,
            escape_field(&self.name),
            self.points.map(|p| p.to_string()).unwrap_or_default(),
            escape_field(&self.prize)
        )
    }
}
