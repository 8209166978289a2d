use chrono::NaiveDate;
use sprint_planner::persistence::{MemoryStorage, Snapshot};
use sprint_planner::{
    Assignee, EngineerPatch, HolidayType, KeyValueStore, LoadOutcome, NewEngineer, NewHoliday,
    NewSprint, NewTask, PersistenceError, PersistenceResult, STORAGE_KEY, SeedData, SprintPatch,
    SprintStatus, SprintStore, StoreError, TaskPatch, TaskStatus,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded() -> SprintStore<MemoryStorage> {
    SprintStore::new(MemoryStorage::new(), SeedData::bundled().unwrap())
}

fn empty() -> SprintStore<MemoryStorage> {
    SprintStore::new(MemoryStorage::new(), SeedData::empty())
}

fn stored_snapshot(store: &SprintStore<MemoryStorage>) -> Snapshot {
    let raw = store
        .storage()
        .get(STORAGE_KEY)
        .unwrap()
        .expect("snapshot persisted");
    Snapshot::from_json(&raw).unwrap()
}

/// Accepts reads, refuses writes.
struct ReadOnlyStorage;

impl KeyValueStore for ReadOnlyStorage {
    fn get(&self, _key: &str) -> PersistenceResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> PersistenceResult<()> {
        Err(PersistenceError::InvalidData("storage is read-only".into()))
    }

    fn remove(&self, _key: &str) -> PersistenceResult<()> {
        Ok(())
    }
}

#[test]
fn new_store_holds_seed_data_without_persisting() {
    let store = seeded();
    assert_eq!(store.tasks().len(), 8);
    assert_eq!(store.engineers().len(), 3);
    assert_eq!(store.sprints().len(), 4);
    assert_eq!(store.holidays().len(), 4);
    assert_eq!(store.stats(), store.seed().stats);
    assert!(store.storage().is_empty());
}

#[test]
fn add_task_assigns_next_id_and_persists() {
    let mut store = seeded();
    let mut task = NewTask::new("Write release notes", Assignee::Pure, 4);
    task.story_points = 2;
    let tasks = store.add_task(task).unwrap();
    assert_eq!(tasks.len(), 9);
    let added = tasks.last().unwrap();
    assert_eq!(added.id, 9);
    assert_eq!(added.status, TaskStatus::Todo);

    let snapshot = stored_snapshot(&store);
    assert_eq!(snapshot.tasks.len(), 9);
    assert_eq!(snapshot.tasks[8].title, "Write release notes");
    assert_eq!(snapshot.last_ids.task, 9);
}

#[test]
fn first_record_in_empty_collection_gets_id_one() {
    let mut store = empty();
    let tasks = store
        .add_task(NewTask::new("First", Assignee::Arpit, 1))
        .unwrap();
    assert_eq!(tasks[0].id, 1);
    let sprints = store
        .add_sprint(NewSprint::new("Sprint 1", d(2024, 1, 8), d(2024, 1, 19)))
        .unwrap();
    assert_eq!(sprints[0].id, 1);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let mut store = seeded();
    store.delete_task(8).unwrap();
    let tasks = store
        .add_task(NewTask::new("Replacement", Assignee::Keerthi, 4))
        .unwrap();
    assert_eq!(tasks.last().unwrap().id, 9);

    store.delete_engineer(3).unwrap();
    let engineers = store
        .add_engineer(NewEngineer::new("Sam", "QA Engineer"))
        .unwrap();
    assert_eq!(engineers.last().unwrap().id, 4);
}

#[test]
fn update_task_merges_only_given_fields() {
    let mut store = seeded();
    let patch = TaskPatch {
        title: Some("Capacity tracking API v2".into()),
        story_points: Some(13),
        ..TaskPatch::default()
    };
    store.update_task(3, patch).unwrap();
    let task = store.find_task(3).unwrap();
    assert_eq!(task.title, "Capacity tracking API v2");
    assert_eq!(task.story_points, 13);
    assert_eq!(task.assignee, Assignee::Arpit);
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(stored_snapshot(&store).tasks[2].story_points, 13);
}

#[test]
fn unknown_ids_leave_collections_and_storage_untouched() {
    let mut store = seeded();
    let tasks = store
        .update_task(99, TaskPatch::status(TaskStatus::Completed))
        .unwrap();
    assert_eq!(tasks.len(), 8);
    assert_eq!(store.delete_task(99).unwrap().len(), 8);
    assert_eq!(store.delete_engineer(99).unwrap().len(), 3);
    assert_eq!(store.delete_sprint(99).unwrap().len(), 4);
    assert_eq!(store.delete_holiday(99).unwrap().len(), 4);
    assert_eq!(store.advance_task(99).unwrap(), None);
    assert!(store.storage().is_empty());
}

#[test]
fn blank_task_title_is_rejected() {
    let mut store = seeded();
    let err = store
        .add_task(NewTask::new("   ", Assignee::Pure, 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(err.to_string().contains("task title is required"));
    assert_eq!(store.tasks().len(), 8);
    assert!(store.storage().is_empty());

    let patch = TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    };
    assert!(store.update_task(1, patch).is_err());
    assert_eq!(store.find_task(1).unwrap().title, "Set up project scaffolding");
}

#[test]
fn engineer_capacity_above_hundred_is_rejected() {
    let mut store = seeded();
    let mut engineer = NewEngineer::new("Sam", "QA Engineer");
    engineer.capacity = 150;
    assert!(matches!(
        store.add_engineer(engineer),
        Err(StoreError::Validation(_))
    ));

    let patch = EngineerPatch {
        available_days: Some(-1.0),
        ..EngineerPatch::default()
    };
    assert!(store.update_engineer(1, patch).is_err());
    assert_eq!(store.find_engineer(1).unwrap().available_days, 10.0);
}

#[test]
fn engineer_allocated_days_follow_updates() {
    let mut store = seeded();
    assert_eq!(store.find_engineer(1).unwrap().allocated_days(), 8.0);
    let patch = EngineerPatch {
        capacity: Some(50),
        available_days: Some(6.0),
        ..EngineerPatch::default()
    };
    store.update_engineer(1, patch).unwrap();
    assert_eq!(store.find_engineer(1).unwrap().allocated_days(), 3.0);
    assert_eq!(store.stats().planned_capacity, 70);
}

#[test]
fn sprint_working_days_follow_date_changes() {
    let mut store = seeded();
    let sprints = store
        .add_sprint(NewSprint::new("Sprint 5", d(2024, 3, 4), d(2024, 3, 8)))
        .unwrap();
    let added = sprints.last().unwrap();
    assert_eq!(added.id, 5);
    assert_eq!(added.working_days(), 5);

    let patch = SprintPatch {
        end_date: Some(d(2024, 3, 15)),
        ..SprintPatch::default()
    };
    store.update_sprint(5, patch).unwrap();
    assert_eq!(store.find_sprint(5).unwrap().working_days(), 10);
}

#[test]
fn sprint_ending_before_it_starts_is_rejected() {
    let mut store = seeded();
    let err = store
        .add_sprint(NewSprint::new("Backwards", d(2024, 3, 8), d(2024, 3, 4)))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // moving only the end date is checked against the current start
    let patch = SprintPatch {
        end_date: Some(d(2024, 1, 1)),
        ..SprintPatch::default()
    };
    assert!(store.update_sprint(1, patch).is_err());
    assert_eq!(store.find_sprint(1).unwrap().end_date, d(2024, 1, 19));
}

#[test]
fn stats_track_sprint_status_changes() {
    let mut store = seeded();
    assert_eq!(store.stats().active_sprints, 1);
    store
        .update_sprint(3, SprintPatch::status(SprintStatus::Active))
        .unwrap();
    assert_eq!(store.stats().active_sprints, 2);
    assert_eq!(stored_snapshot(&store).stats.active_sprints, 2);
}

#[test]
fn advance_task_walks_the_workflow() {
    let mut store = seeded();
    assert_eq!(store.advance_task(5).unwrap(), Some(TaskStatus::InProgress));
    assert_eq!(store.advance_task(5).unwrap(), Some(TaskStatus::Completed));
    assert_eq!(store.advance_task(5).unwrap(), None);
    assert_eq!(store.find_task(5).unwrap().status, TaskStatus::Completed);

    assert_eq!(store.advance_task(6).unwrap(), Some(TaskStatus::Todo));
}

#[test]
fn holiday_blank_description_is_dropped() {
    let mut store = seeded();
    let mut holiday = NewHoliday::new("Team offsite", d(2024, 4, 12), HolidayType::Company);
    holiday.description = Some("  ".into());
    let holidays = store.add_holiday(holiday).unwrap();
    let added = holidays.last().unwrap();
    assert_eq!(added.id, 5);
    assert_eq!(added.description, None);
    assert!(!added.recurring);
}

#[test]
fn deleting_a_sprint_keeps_its_tasks_and_name() {
    let mut store = seeded();
    store.delete_sprint(4).unwrap();
    assert_eq!(store.sprints().len(), 3);
    assert_eq!(store.find_task(8).unwrap().sprint_id, 4);
    assert_eq!(store.sprint_name(4), Some("Sprint 4 - Polish"));
    assert_eq!(store.sprint_name(42), None);
}

#[test]
fn reset_restores_seed_collections() {
    let mut store = seeded();
    store.delete_task(1).unwrap();
    store
        .add_task(NewTask::new("Extra", Assignee::Arpit, 2))
        .unwrap();
    store.reset_data().unwrap();

    assert_eq!(store.tasks(), store.seed().tasks.as_slice());
    assert_eq!(stored_snapshot(&store).tasks.len(), 8);
}

#[test]
fn ids_issued_before_reset_are_not_reissued() {
    let mut store = seeded();
    store
        .add_task(NewTask::new("Before reset", Assignee::Arpit, 2))
        .unwrap();
    store.reset_data().unwrap();
    assert_eq!(store.last_ids().task, 9);
    assert_eq!(stored_snapshot(&store).last_ids.task, 9);

    let tasks = store
        .add_task(NewTask::new("After reset", Assignee::Arpit, 2))
        .unwrap();
    assert_eq!(tasks.last().unwrap().id, 10);
}

#[test]
fn load_from_storage_reports_missing_snapshot() {
    let mut store = seeded();
    assert_eq!(store.load_from_storage().unwrap(), LoadOutcome::Missing);
    assert_eq!(store.tasks().len(), 8);
}

#[test]
fn second_store_loads_what_the_first_persisted() {
    let storage = MemoryStorage::new();
    let seed = SeedData::bundled().unwrap();
    {
        let mut first = SprintStore::new(&storage, seed.clone());
        first.delete_task(2).unwrap();
        first
            .add_task(NewTask::new("Persisted", Assignee::Pure, 3))
            .unwrap();
    }
    let mut second = SprintStore::new(&storage, seed);
    assert_eq!(second.load_from_storage().unwrap(), LoadOutcome::Loaded);
    assert_eq!(second.tasks().len(), 8);
    assert!(second.find_task(2).is_none());
    assert_eq!(second.find_task(9).unwrap().title, "Persisted");
    let tasks = second
        .add_task(NewTask::new("Next", Assignee::Pure, 3))
        .unwrap();
    assert_eq!(tasks.last().unwrap().id, 10);
}

#[test]
fn corrupt_snapshot_leaves_state_unchanged() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_KEY, "{ not json").unwrap();
    let mut store = SprintStore::new(&storage, SeedData::bundled().unwrap());
    assert!(store.load_from_storage().is_err());
    assert_eq!(store.tasks().len(), 8);

    let opened = SprintStore::open(&storage, SeedData::bundled().unwrap());
    assert_eq!(opened.sprints().len(), 4);
}

#[test]
fn failed_write_keeps_the_in_memory_change() {
    let mut store = SprintStore::new(ReadOnlyStorage, SeedData::bundled().unwrap());
    let err = store
        .add_task(NewTask::new("Unsaved", Assignee::Keerthi, 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    assert_eq!(store.tasks().len(), 9);
    assert!(store.persist().is_err());
}

#[test]
fn custom_storage_key_is_used() {
    let mut store = SprintStore::new_with_key(
        MemoryStorage::new(),
        "planner-test",
        SeedData::bundled().unwrap(),
    );
    store.persist().unwrap();
    assert_eq!(store.storage_key(), "planner-test");
    assert!(store.storage().get("planner-test").unwrap().is_some());
    assert!(store.storage().get(STORAGE_KEY).unwrap().is_none());
}
