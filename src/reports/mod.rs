//! Report generation module
//!
//! Points reports, prize winner selection and the CSV layout both share.

pub mod csv;
pub mod points;
pub mod winners;

pub use self::csv::{write_report_file, CsvRecord, CsvWriter};
pub use points::{generate_report, parse_points_report, ReportRow, POINTS_REPORT_PREFIX};
pub use winners::{
    best_qualifying_prize, select_winners, GradeAnomaly, SelectionError, Winner, WinnerCategory,
    WinnerResult, WinnerRow, WINNERS_REPORT_PREFIX,
};
