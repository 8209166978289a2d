#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use sprint_planner::persistence::SqliteStorage;
use sprint_planner::{
    HolidayType, KeyValueStore, LoadOutcome, NewHoliday, SeedData, SprintPatch, SprintStatus,
    SprintStore,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sqlite_storage_get_set_remove() {
    let storage = SqliteStorage::in_memory().unwrap();
    assert_eq!(storage.get("projectData").unwrap(), None);
    storage.set("projectData", "first").unwrap();
    storage.set("projectData", "second").unwrap();
    assert_eq!(
        storage.get("projectData").unwrap().as_deref(),
        Some("second")
    );
    storage.remove("projectData").unwrap();
    assert_eq!(storage.get("projectData").unwrap(), None);
}

#[test]
fn sqlite_store_round_trip() {
    let file = NamedTempFile::new().unwrap();
    {
        let storage = SqliteStorage::new(file.path()).unwrap();
        let mut store = SprintStore::open(storage, SeedData::bundled().unwrap());
        store
            .update_sprint(2, SprintPatch::status(SprintStatus::Completed))
            .unwrap();
        let mut holiday = NewHoliday::new("Independence Day", d(2024, 7, 4), HolidayType::National);
        holiday.recurring = true;
        store.add_holiday(holiday).unwrap();
    }

    let storage = SqliteStorage::new(file.path()).unwrap();
    let mut store = SprintStore::new(storage, SeedData::empty());
    assert_eq!(store.load_from_storage().unwrap(), LoadOutcome::Loaded);
    assert_eq!(store.sprints().len(), 4);
    assert_eq!(store.find_sprint(2).unwrap().status, SprintStatus::Completed);
    assert_eq!(store.stats().active_sprints, 0);

    let holiday = store.find_holiday(5).unwrap();
    assert_eq!(holiday.name, "Independence Day");
    assert!(holiday.recurring);
}

#[test]
fn sqlite_keys_are_independent() {
    let file = NamedTempFile::new().unwrap();
    let storage = SqliteStorage::new(file.path()).unwrap();
    storage.set("a", "1").unwrap();
    storage.set("b", "2").unwrap();
    storage.remove("a").unwrap();
    assert_eq!(storage.get("a").unwrap(), None);
    assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
}
