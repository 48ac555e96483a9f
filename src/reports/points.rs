//! Student points report

use serde::{Deserialize, Serialize};

use super::csv::{escape_field, split_line, CsvRecord};
use crate::models::Student;
use crate::utils::errors::{Result, TrackerError};

/// File name prefix for points reports
pub const POINTS_REPORT_PREFIX: &str = "Student_Points_Report";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub grade: i32,
    pub name: String,
    pub points: i32,
}

impl From<&Student> for ReportRow {
    fn from(student: &Student) -> Self {
        Self {
            grade: student.grade,
            name: student.report_name(),
            points: student.points,
        }
    }
}

impl CsvRecord for ReportRow {
    fn header() -> &'static str {
        "Grade,Name,Points"
    }

    fn to_line(&self) -> String {
        format!("{}, {}, {}", self.grade, escape_field(&self.name), self.points)
    }
}

/// One row per student, in input order.
///
/// Callers sort by grade beforehand; nothing is filtered or aggregated.
pub fn generate_report(students: &[Student]) -> Vec<ReportRow> {
    students.iter().map(ReportRow::from).collect()
}

/// Parse a points report produced by [`generate_report`] and the CSV writer
pub fn parse_points_report(text: &str) -> Result<Vec<ReportRow>> {
    let mut lines = text.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header == ReportRow::header() => {}
        Some((_, header)) => {
            return Err(TrackerError::ReportParse {
                line: 1,
                message: format!("unexpected header '{}'", header),
            })
        }
        None => {
            return Err(TrackerError::ReportParse {
                line: 1,
                message: "missing header".to_string(),
            })
        }
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        let line_number = index + 1;
        if line.is_empty() {
            continue;
        }

        let fields = split_line(line, line_number)?;
        if fields.len() != 3 {
            return Err(TrackerError::ReportParse {
                line: line_number,
                message: format!("expected 3 fields, found {}", fields.len()),
            });
        }

        let number = |value: &str, what: &str| -> Result<i32> {
            value.trim().parse::<i32>().map_err(|e| TrackerError::ReportParse {
                line: line_number,
                message: format!("invalid {} '{}': {}", what, value, e),
            })
        };

        rows.push(ReportRow {
            grade: number(&fields[0], "grade")?,
            name: fields[1].clone(),
            points: number(&fields[2], "points")?,
        });
    }

    Ok(rows)
}
