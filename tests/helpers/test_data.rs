//! Test data builders

use chrono::NaiveDate;
use participation_tracker::models::{Event, EventType, Prize, Student};

/// Helper function to create a test student
pub fn create_test_student(id: i32, last: &str, first: &str, grade: i32, points: i32) -> Student {
    Student {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        middle_initial: String::new(),
        grade,
        points,
    }
}

pub fn create_test_prize(id: i32, name: &str, min_points: i32) -> Prize {
    Prize {
        id,
        name: name.to_string(),
        min_points,
        prize_type: "Merch".to_string(),
    }
}

pub fn create_test_event(id: i32, name: &str, event_type: i32) -> Event {
    Event {
        id,
        name: name.to_string(),
        description: format!("{} description", name),
        event_date: NaiveDate::from_ymd_opt(2024, 3, 1 + id as u32 % 28).unwrap_or_default(),
        location: "Gym".to_string(),
        event_type,
    }
}

pub fn create_test_event_type(id: i32, type_name: &str, points_awarded: i32) -> EventType {
    EventType {
        id,
        type_name: type_name.to_string(),
        points_awarded,
    }
}

/// Two students per grade with distinct points
pub fn sample_roster() -> Vec<Student> {
    vec![
        create_test_student(1, "Adams", "Amy", 9, 10),
        create_test_student(2, "Baker", "Ben", 9, 35),
        create_test_student(3, "Clark", "Cara", 10, 60),
        create_test_student(4, "Davis", "Dan", 10, 5),
        create_test_student(5, "Evans", "Eve", 11, 80),
        create_test_student(6, "Ford", "Finn", 11, 20),
        create_test_student(7, "Green", "Gail", 12, 45),
        create_test_student(8, "Hill", "Hank", 12, 75),
    ]
}

/// Thresholds 0, 50 and 100
pub fn sample_prizes() -> Vec<Prize> {
    vec![
        create_test_prize(1, "Sticker", 0),
        create_test_prize(2, "T-Shirt", 50),
        create_test_prize(3, "Hoodie", 100),
    ]
}
