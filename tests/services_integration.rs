//! End-to-end tests of the save pipeline and occurrence resolution against
//! the in-memory repository.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;

use classtable::api::UserId;
use classtable::db::{LocalRepository, ScheduleRepository};
use classtable::models::parse_document_json_str;
use classtable::services::{
    normalize_document, resolve_occurrence, validate_document, OccurrenceQuery,
};

const SHANGHAI: Tz = chrono_tz::Asia::Shanghai;

fn sample_document_json() -> &'static str {
    r#"{
        "start_date": "2024-09-02",
        "tz": "Asia/Shanghai",
        "enabled_days": [5, 1, 2, 3, 4, 1],
        "timeslots": [
            {"idx": 2, "start": "08:55", "end": "09:40"},
            {"idx": 1, "start": "08:00", "end": "08:45"}
        ],
        "courses": [
            {
                "name": "Compilers",
                "teacher": "Prof. Song",
                "room": "A-101",
                "day": 1,
                "periods": [1, 2],
                "weeks": "01-16",
                "week_type": "all",
                "note": ""
            },
            {
                "name": "Seminar",
                "teacher": "",
                "room": "",
                "day": 3,
                "periods": [2],
                "weeks": "01-16",
                "week_type": "odd",
                "note": ""
            }
        ]
    }"#
}

#[tokio::test]
async fn test_save_pipeline_and_fetch() {
    let repo = LocalRepository::new();
    let user = UserId::new(100001);

    let mut doc = parse_document_json_str(sample_document_json()).unwrap();
    validate_document(&doc).unwrap();
    normalize_document(&mut doc);
    repo.store_document(user, &doc).await.unwrap();

    let stored = repo.fetch_document(user).await.unwrap().unwrap();
    // Normalization ran before the store.
    assert_eq!(stored.enabled_days, vec![1, 2, 3, 4, 5]);
    assert_eq!(
        stored.timeslots.iter().map(|t| t.idx).collect::<Vec<u8>>(),
        vec![1, 2]
    );
}

#[tokio::test]
async fn test_occurrence_against_stored_document() {
    let repo = LocalRepository::new();
    let user = UserId::new(100001);

    let mut doc = parse_document_json_str(sample_document_json()).unwrap();
    normalize_document(&mut doc);
    repo.store_document(user, &doc).await.unwrap();

    let stored = repo.fetch_document(user).await.unwrap().unwrap();
    // Monday of week 1, 08:20 local: first period of Compilers is running.
    let now = SHANGHAI
        .with_ymd_and_hms(2024, 9, 2, 8, 20, 0)
        .unwrap()
        .with_timezone(&Utc);
    let snap = resolve_occurrence(&stored, &OccurrenceQuery::new(now));

    assert_eq!(snap.week_no, 1);
    assert_eq!(snap.current_courses.len(), 1);
    assert_eq!(snap.current_courses[0].name, "Compilers");
    // Wednesday week 1 is odd, so the seminar sits in the grid at (3, 2).
    assert_eq!(snap.grid[&3][&2].len(), 1);
}

#[tokio::test]
async fn test_parity_changes_between_weeks() {
    let repo = LocalRepository::new();
    let user = UserId::new(100001);
    let doc = parse_document_json_str(sample_document_json()).unwrap();
    repo.store_document(user, &doc).await.unwrap();
    let stored = repo.fetch_document(user).await.unwrap().unwrap();

    // Week 2 (even): the odd-week seminar disappears from the grid.
    let week2 = SHANGHAI
        .with_ymd_and_hms(2024, 9, 11, 9, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let snap = resolve_occurrence(&stored, &OccurrenceQuery::new(week2));
    assert_eq!(snap.week_no, 2);
    assert!(snap.grid[&3][&2].is_empty());

    // Unless the viewer asks for every week.
    let snap_all = resolve_occurrence(&stored, &OccurrenceQuery::new(week2).show_all(true));
    assert_eq!(snap_all.grid[&3][&2].len(), 1);
}

#[tokio::test]
async fn test_clear_schedule_removes_document() {
    let repo = LocalRepository::new();
    let user = UserId::new(123456);
    let doc = parse_document_json_str(sample_document_json()).unwrap();

    repo.store_document(user, &doc).await.unwrap();
    repo.clear_document(user).await.unwrap();
    assert!(repo.fetch_document(user).await.unwrap().is_none());
}

#[tokio::test]
async fn test_last_write_wins() {
    let repo = LocalRepository::new();
    let user = UserId::new(4242);

    let mut first = parse_document_json_str(sample_document_json()).unwrap();
    first.courses.truncate(1);
    let second = parse_document_json_str(sample_document_json()).unwrap();

    repo.store_document(user, &first).await.unwrap();
    repo.store_document(user, &second).await.unwrap();

    let stored = repo.fetch_document(user).await.unwrap().unwrap();
    assert_eq!(stored.courses.len(), 2);
}

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(repo.health_check().await.unwrap());
}
