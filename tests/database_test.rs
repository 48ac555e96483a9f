//! Postgres-backed store tests
//!
//! Run against `TEST_DATABASE_URL` when set, otherwise against a Postgres
//! container started for each test.

mod helpers;

use chrono::NaiveDate;
use serial_test::serial;

use helpers::TestDatabase;
use participation_tracker::database::{
    DataStore, EventEditStore, EventStore, PrizeEditStore, StudentEditStore,
};
use participation_tracker::models::{
    CreateEventRequest, CreatePrizeRequest, CreateStudentRequest, SortKey, UpdateEventRequest,
    UpdatePrizeRequest,
};
use participation_tracker::TrackerError;

fn student_request(first: &str, last: &str, grade: i32) -> CreateStudentRequest {
    CreateStudentRequest {
        first_name: first.to_string(),
        last_name: last.to_string(),
        middle_initial: String::new(),
        grade,
    }
}

#[tokio::test]
#[serial]
async fn test_points_follow_attendance() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service = db.service();

    let jane = service
        .register_student(student_request("Jane", "Doe", 10))
        .await
        .unwrap();
    let rick = service
        .register_student(student_request("Rick", "Roe", 12))
        .await
        .unwrap();
    assert_eq!(jane.points, 0);

    let game = db.seed_event(25).await.unwrap();
    let concert = db.seed_event(40).await.unwrap();
    service.record_attendance(game, jane.id).await.unwrap();
    service.record_attendance(concert, jane.id).await.unwrap();
    service.record_attendance(game, rick.id).await.unwrap();

    let by_points = service.list_students(SortKey::Points).await.unwrap();
    let summary: Vec<(i32, i32)> = by_points.iter().map(|s| (s.id, s.points)).collect();
    assert_eq!(summary, vec![(jane.id, 65), (rick.id, 25)]);

    let found = service.search_students("roe", SortKey::Alphabetical).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, rick.id);
}

#[tokio::test]
#[serial]
async fn test_attendance_diff_is_applied_atomically() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service = db.service();

    let mut jane = service
        .register_student(student_request("Jane", "Doe", 9))
        .await
        .unwrap();
    let first = db.seed_event(10).await.unwrap();
    let second = db.seed_event(20).await.unwrap();
    service.record_attendance(first, jane.id).await.unwrap();

    jane.grade = 10;
    service
        .update_student_and_attendance(&jane, &[first], &[second])
        .await
        .unwrap();

    let attended: Vec<i32> = service
        .attended_events(jane.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.event_id)
        .collect();
    assert_eq!(attended, vec![second]);

    let by_grade = service.list_students(SortKey::Grade).await.unwrap();
    assert_eq!((by_grade[0].grade, by_grade[0].points), (10, 20));

    // A failing update leaves attendance untouched
    let mut ghost = jane.clone();
    ghost.id = 9999;
    let err = service
        .update_student_and_attendance(&ghost, &[second], &[first])
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::StudentNotFound { student_id: 9999 }));
    assert_eq!(db.count_records("attendance").await.unwrap(), 1);

    service.delete_student(jane.id).await.unwrap();
    assert!(service.list_students(SortKey::Grade).await.unwrap().is_empty());
    assert_eq!(db.count_records("attendance").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_event_writes() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service = db.service();
    let sports = db.seed_event_type(10).await.unwrap();

    let created = service
        .create_event(CreateEventRequest {
            name: "Spring Dance".to_string(),
            description: "Formal".to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 4, 12).unwrap(),
            location: "Gym".to_string(),
            event_type: sports,
        })
        .await
        .unwrap();

    let updated = service
        .update_event(
            created.id,
            UpdateEventRequest {
                location: Some("Cafeteria".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.location, "Cafeteria");
    assert_eq!(updated.name, "Spring Dance");
    assert_eq!(updated.event_date, created.event_date);

    let found = service.search_events("dance").await.unwrap();
    assert_eq!(found, vec![updated.clone()]);

    service.delete_event(created.id).await.unwrap();
    assert!(service.list_events().await.unwrap().is_empty());
    assert!(matches!(
        service.delete_event(created.id).await,
        Err(TrackerError::EventNotFound { .. })
    ));
    assert!(matches!(
        service
            .update_event(created.id, UpdateEventRequest::default())
            .await,
        Err(TrackerError::EventNotFound { .. })
    ));
}

#[tokio::test]
#[serial]
async fn test_prizes_listed_by_threshold() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service = db.service();

    for (name, min_points) in [("Hoodie", 100), ("Sticker", 0), ("T-Shirt", 50)] {
        service
            .create_prize(CreatePrizeRequest {
                name: name.to_string(),
                min_points,
                prize_type: "Merch".to_string(),
            })
            .await
            .unwrap();
    }

    let thresholds: Vec<i32> = service
        .list_prizes()
        .await
        .unwrap()
        .iter()
        .map(|p| p.min_points)
        .collect();
    assert_eq!(thresholds, vec![0, 50, 100]);

    let stats = service.get_system_stats().await.unwrap();
    assert_eq!(stats["prizes"], 3);
}

#[tokio::test]
#[serial]
async fn test_prize_update_and_delete() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service = db.service();

    let pin = service
        .create_prize(CreatePrizeRequest {
            name: "Pin".to_string(),
            min_points: 10,
            prize_type: "Merch".to_string(),
        })
        .await
        .unwrap();

    let updated = service
        .update_prize(
            pin.id,
            UpdatePrizeRequest {
                min_points: Some(15),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((updated.name.as_str(), updated.min_points), ("Pin", 15));

    let negative = UpdatePrizeRequest {
        min_points: Some(-1),
        ..Default::default()
    };
    assert!(matches!(
        service.update_prize(pin.id, negative).await,
        Err(TrackerError::InvalidInput(_))
    ));

    service.delete_prize(pin.id).await.unwrap();
    assert!(service.list_prizes().await.unwrap().is_empty());
    assert!(matches!(
        service.delete_prize(pin.id).await,
        Err(TrackerError::PrizeNotFound { .. })
    ));
}
