use squad_core::db::establish_connection;
use squad_core::error::CoreError;
use squad_core::models::*;
use squad_core::recurrence::MAX_GENERATED_OCCURRENCES;
use squad_core::repository::{ScheduleRepository, SeriesRepository, SqliteRepository};
use chrono::NaiveDate;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper function to create a test database
async fn setup_test_db() -> (SqliteRepository, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (SqliteRepository::new(pool), temp_dir)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekly practice from 2024-01-01 with four members (Jan 1, 8, 15, 22).
fn weekly_practice() -> NewScheduleData {
    let mut data = NewScheduleData::new("Practice", date(2024, 1, 1));
    data.start_hour = Some(18);
    data.start_minute = Some(0);
    data.venue = Some("Gym A".to_string());
    data.recurrence_rule = RecurrenceRule::Weekly;
    data.recurrence_end_date = Some(date(2024, 1, 22));
    data
}

async fn count_all(repo: &SqliteRepository) -> usize {
    repo.find_schedules(&ScheduleFilter::default())
        .await
        .expect("Failed to list schedules")
        .len()
}

#[tokio::test]
async fn test_biweekly_series_creation() {
    let (repo, _temp_dir) = setup_test_db().await;

    let mut data = NewScheduleData::new("Practice", date(2024, 1, 1));
    data.recurrence_rule = RecurrenceRule::Weekly;
    data.recurrence_interval = Some(2);
    data.recurrence_end_date = Some(date(2024, 2, 1));

    let created = repo.create_series(data).await.unwrap();
    assert_eq!(created.total_created, 3);

    let dates: Vec<_> = created.all_rows.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 29)]);

    // A blank venue is stored as undecided on every member.
    for row in &created.all_rows {
        assert_eq!(row.venue, UNDECIDED_VENUE);
        assert_eq!(row.series_id, created.root.id);
        assert_eq!(row.recurrence_interval, 2);
    }
    assert_eq!(count_all(&repo).await, 3);
}

#[tokio::test]
async fn test_one_off_schedule_is_its_own_series() {
    let (repo, _temp_dir) = setup_test_db().await;

    let created = repo
        .create_series(NewScheduleData::new("Friendly match", date(2024, 6, 1)))
        .await
        .unwrap();

    assert_eq!(created.total_created, 1);
    assert!(created.root.is_root());
    assert_eq!(created.root.series_id, created.root.id);
    assert_eq!(created.root.recurrence_rule, RecurrenceRule::None);
    assert_eq!(created.root.recurrence_interval, 1);
}

#[tokio::test]
async fn test_generation_cap_on_file_database() {
    let (repo, _temp_dir) = setup_test_db().await;

    let mut data = NewScheduleData::new("Conditioning", date(2024, 1, 1));
    data.recurrence_rule = RecurrenceRule::Daily;
    data.recurrence_end_date = Some(date(2030, 1, 1));

    let created = repo.create_series(data).await.unwrap();
    assert_eq!(created.total_created, MAX_GENERATED_OCCURRENCES + 1);
    assert_eq!(created.all_rows.last().unwrap().date, date(2024, 4, 10));
    assert_eq!(count_all(&repo).await, MAX_GENERATED_OCCURRENCES + 1);

    let summary = repo.series_summary(created.root.id).await.unwrap();
    assert_eq!(summary.member_count, MAX_GENERATED_OCCURRENCES + 1);
    assert_eq!(summary.root_id, Some(created.root.id));
    assert_eq!(summary.first_date, Some(date(2024, 1, 1)));
    assert_eq!(summary.last_date, Some(date(2024, 4, 10)));
}

#[tokio::test]
async fn test_invalid_template_writes_nothing() {
    let (repo, _temp_dir) = setup_test_db().await;

    let mut bad_interval = weekly_practice();
    bad_interval.recurrence_interval = Some(0);
    assert!(matches!(
        repo.create_series(bad_interval).await,
        Err(CoreError::InvalidRecurrence(_))
    ));

    let mut bad_end = weekly_practice();
    bad_end.recurrence_end_date = Some(date(2023, 12, 31));
    assert!(matches!(
        repo.create_series(bad_end).await,
        Err(CoreError::InvalidRecurrence(_))
    ));

    let mut bad_time = weekly_practice();
    bad_time.gather_hour = Some(25);
    assert!(matches!(
        repo.create_series(bad_time).await,
        Err(CoreError::InvalidInput(_))
    ));

    let mut blank_title = weekly_practice();
    blank_title.title = "   ".to_string();
    assert!(matches!(
        repo.create_series(blank_title).await,
        Err(CoreError::InvalidInput(_))
    ));

    assert_eq!(count_all(&repo).await, 0);
}

#[tokio::test]
async fn test_update_this_touches_one_row() {
    let (repo, _temp_dir) = setup_test_db().await;
    let created = repo.create_series(weekly_practice()).await.unwrap();
    let second = created.all_rows[1].clone();

    let changes = UpdateScheduleData {
        date: Some(date(2024, 1, 9)),
        venue: Some("Gym B".to_string()),
        start_hour: Some(None),
        ..Default::default()
    };
    let updated = repo
        .update_occurrence(second.id, changes, EditScope::This)
        .await
        .unwrap();

    assert_eq!(updated.id, second.id);
    assert_eq!(updated.date, date(2024, 1, 9));
    assert_eq!(updated.venue, "Gym B");
    assert_eq!(updated.start_hour, None);
    assert_eq!(updated.parent_schedule_id, Some(created.root.id));

    let members = repo.find_series_members(created.root.id).await.unwrap();
    let untouched: Vec<_> = members.iter().filter(|s| s.id != second.id).collect();
    assert_eq!(untouched.len(), 3);
    for row in untouched {
        assert_eq!(row.venue, "Gym A");
        assert_eq!(row.start_hour, Some(18));
    }
}

#[tokio::test]
async fn test_update_all_keeps_each_date() {
    let (repo, _temp_dir) = setup_test_db().await;
    let created = repo.create_series(weekly_practice()).await.unwrap();
    let original_dates: Vec<_> = created.all_rows.iter().map(|s| s.date).collect();

    // Addressed through a child; the date change must not fan out.
    let changes = UpdateScheduleData {
        date: Some(date(2024, 3, 1)),
        title: Some("  Evening practice ".to_string()),
        notes: Some(Some("Bring bibs".to_string())),
        category_ids: Some(vec!["u12".to_string()]),
        ..Default::default()
    };
    let updated = repo
        .update_occurrence(created.all_rows[2].id, changes, EditScope::All)
        .await
        .unwrap();
    assert_eq!(updated.date, date(2024, 1, 15));
    assert_eq!(updated.title, "Evening practice");

    let members = repo.find_series_members(created.root.id).await.unwrap();
    let dates: Vec<_> = members.iter().map(|s| s.date).collect();
    assert_eq!(dates, original_dates);
    for row in &members {
        assert_eq!(row.title, "Evening practice");
        assert_eq!(row.notes.as_deref(), Some("Bring bibs"));
        assert_eq!(row.category_ids.0, vec!["u12".to_string()]);
    }
}

#[tokio::test]
async fn test_update_all_leaves_other_series_alone() {
    let (repo, _temp_dir) = setup_test_db().await;
    let first = repo.create_series(weekly_practice()).await.unwrap();
    let second = repo.create_series(weekly_practice()).await.unwrap();

    let changes = UpdateScheduleData {
        venue: Some("Field 3".to_string()),
        ..Default::default()
    };
    repo.update_occurrence(first.root.id, changes, EditScope::All)
        .await
        .unwrap();

    for row in repo.find_series_members(second.root.id).await.unwrap() {
        assert_eq!(row.venue, "Gym A");
    }
}

#[tokio::test]
async fn test_invalid_update_rolls_back() {
    let (repo, _temp_dir) = setup_test_db().await;
    let created = repo.create_series(weekly_practice()).await.unwrap();

    let changes = UpdateScheduleData {
        venue: Some("Gym B".to_string()),
        end_minute: Some(Some(75)),
        ..Default::default()
    };
    let result = repo
        .update_occurrence(created.root.id, changes, EditScope::All)
        .await;
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));

    for row in repo.find_series_members(created.root.id).await.unwrap() {
        assert_eq!(row.venue, "Gym A");
    }
}

#[tokio::test]
async fn test_delete_all_from_root_or_child() {
    let (repo, _temp_dir) = setup_test_db().await;
    let keep = repo.create_series(weekly_practice()).await.unwrap();

    let from_root = repo.create_series(weekly_practice()).await.unwrap();
    let removed = repo
        .delete_occurrence(from_root.root.id, EditScope::All)
        .await
        .unwrap();
    assert_eq!(removed, 4);

    let from_child = repo.create_series(weekly_practice()).await.unwrap();
    let removed = repo
        .delete_occurrence(from_child.all_rows[3].id, EditScope::All)
        .await
        .unwrap();
    assert_eq!(removed, 4);

    let remaining = repo.find_schedules(&ScheduleFilter::default()).await.unwrap();
    assert_eq!(remaining.len(), 4);
    assert!(remaining.iter().all(|s| s.series_id == keep.root.id));
}

#[tokio::test]
async fn test_delete_this_then_delete_all() {
    let (repo, _temp_dir) = setup_test_db().await;
    let created = repo.create_series(weekly_practice()).await.unwrap();

    // Removing the root on its own leaves the children addressable.
    assert_eq!(
        repo.delete_occurrence(created.root.id, EditScope::This).await.unwrap(),
        1
    );
    assert!(repo.find_schedule_by_id(created.root.id).await.unwrap().is_none());

    let members = repo.find_series_members(created.all_rows[1].id).await.unwrap();
    assert_eq!(members.len(), 3);
    assert!(members.iter().all(|s| s.parent_schedule_id == Some(created.root.id)));

    let removed = repo
        .delete_occurrence(created.all_rows[1].id, EditScope::All)
        .await
        .unwrap();
    assert_eq!(removed, 3);
    assert_eq!(count_all(&repo).await, 0);
}

#[tokio::test]
async fn test_delete_this_child_keeps_rest_of_series() {
    let (repo, _temp_dir) = setup_test_db().await;
    let created = repo.create_series(weekly_practice()).await.unwrap();
    let gone = created.all_rows[2].id;

    assert_eq!(repo.delete_occurrence(gone, EditScope::This).await.unwrap(), 1);
    assert!(repo.find_schedule_by_id(gone).await.unwrap().is_none());

    let root = repo.find_schedule_by_id(created.root.id).await.unwrap();
    assert_eq!(root.as_ref(), Some(&created.root));

    let members = repo.find_series_members(created.root.id).await.unwrap();
    let dates: Vec<_> = members.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 22)]);
    assert!(members.iter().all(|s| s.series_id == created.root.id));
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let (repo, _temp_dir) = setup_test_db().await;
    repo.create_series(weekly_practice()).await.unwrap();
    let missing = Uuid::now_v7();

    for scope in [EditScope::This, EditScope::All] {
        let changes = UpdateScheduleData {
            venue: Some("Gym B".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update_occurrence(missing, changes, scope).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_occurrence(missing, scope).await,
            Err(CoreError::NotFound(_))
        ));
    }
    assert!(matches!(
        repo.find_series_members(missing).await,
        Err(CoreError::NotFound(_))
    ));
    assert_eq!(count_all(&repo).await, 4);
}

#[tokio::test]
async fn test_list_filter_and_order() {
    let (repo, _temp_dir) = setup_test_db().await;

    let mut evening = NewScheduleData::new("Evening", date(2024, 1, 8));
    evening.start_hour = Some(19);
    let mut untimed = NewScheduleData::new("Untimed", date(2024, 1, 8));
    untimed.venue = Some("Park".to_string());
    let mut morning = NewScheduleData::new("Morning", date(2024, 1, 8));
    morning.start_hour = Some(7);
    morning.start_minute = Some(30);

    for data in [evening, untimed, morning, weekly_practice()] {
        repo.create_series(data).await.unwrap();
    }

    let filter = ScheduleFilter {
        from: Some(date(2024, 1, 8)),
        to: Some(date(2024, 1, 15)),
        series_id: None,
    };
    let titles: Vec<_> = repo
        .find_schedules(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.date, s.title))
        .collect();

    assert_eq!(
        titles,
        vec![
            (date(2024, 1, 8), "Morning".to_string()),
            (date(2024, 1, 8), "Practice".to_string()),
            (date(2024, 1, 8), "Evening".to_string()),
            (date(2024, 1, 8), "Untimed".to_string()),
            (date(2024, 1, 15), "Practice".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_short_id_prefix_lookup() {
    let (repo, _temp_dir) = setup_test_db().await;
    let created = repo.create_series(weekly_practice()).await.unwrap();
    let target = &created.all_rows[2];

    let full = target.id.to_string();
    let found = repo.find_schedules_by_short_id_prefix(&full).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, target.id);

    let upper = full[..13].to_uppercase();
    let found = repo.find_schedules_by_short_id_prefix(&upper).await.unwrap();
    assert!(found.iter().any(|s| s.id == target.id));

    assert!(repo.find_schedules_by_short_id_prefix("zz").await.unwrap().is_empty());
}
