//! The authoritative in-process holder of planner data.
//!
//! [`SprintStore`] owns the task, engineer, sprint and holiday collections
//! and is the only component that writes to durable storage. Every mutator
//! writes the full state through to its [`KeyValueStore`] before returning.

use crate::engineer::{Engineer, EngineerPatch, NewEngineer};
use crate::holiday::{Holiday, HolidayPatch, NewHoliday};
use crate::persistence::{
    KeyValueStore, PersistenceError, PersistenceResult, SNAPSHOT_VERSION, SeedData, Snapshot,
};
use crate::sprint::{NewSprint, Sprint, SprintPatch};
use crate::stats::{Stats, TaskStats};
use crate::task::{NewTask, Task, TaskPatch, TaskStatus};
use crate::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Key the snapshot is stored under unless a store is built with another.
pub const STORAGE_KEY: &str = "projectData";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A snapshot was found and replaced the in-memory state.
    Loaded,
    /// Nothing stored under the key; in-memory state untouched.
    Missing,
}

/// Last id issued per collection. Ids only ever grow, even after deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub task: i32,
    pub engineer: i32,
    pub sprint: i32,
    pub holiday: i32,
}

impl IdCounters {
    fn observed(
        tasks: &[Task],
        engineers: &[Engineer],
        sprints: &[Sprint],
        holidays: &[Holiday],
    ) -> Self {
        Self {
            task: max_id(tasks.iter().map(|t| t.id)),
            engineer: max_id(engineers.iter().map(|e| e.id)),
            sprint: max_id(sprints.iter().map(|s| s.id)),
            holiday: max_id(holidays.iter().map(|h| h.id)),
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            task: self.task.max(other.task),
            engineer: self.engineer.max(other.engineer),
            sprint: self.sprint.max(other.sprint),
            holiday: self.holiday.max(other.holiday),
        }
    }
}

fn max_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0).max(0)
}

fn issue_id(last: &mut i32) -> PersistenceResult<i32> {
    let next = last
        .checked_add(1)
        .ok_or_else(|| PersistenceError::InvalidData("id space exhausted".into()))?;
    *last = next;
    Ok(next)
}

pub struct SprintStore<S> {
    storage: S,
    key: String,
    seed: SeedData,
    tasks: Vec<Task>,
    engineers: Vec<Engineer>,
    sprints: Vec<Sprint>,
    holidays: Vec<Holiday>,
    last_ids: IdCounters,
}

impl<S: KeyValueStore> SprintStore<S> {
    /// Build a store holding `seed`, without reading `storage`.
    pub fn new(storage: S, seed: SeedData) -> Self {
        Self::new_with_key(storage, STORAGE_KEY, seed)
    }

    pub fn new_with_key(storage: S, key: impl Into<String>, seed: SeedData) -> Self {
        let last_ids = IdCounters::observed(
            &seed.tasks,
            &seed.engineers,
            &seed.sprints,
            &seed.holidays,
        );
        Self {
            storage,
            key: key.into(),
            tasks: seed.tasks.clone(),
            engineers: seed.engineers.clone(),
            sprints: seed.sprints.clone(),
            holidays: seed.holidays.clone(),
            seed,
            last_ids,
        }
    }

    /// Build a store and load whatever `storage` holds.
    ///
    /// An unreadable snapshot is logged and the seed data is kept; use
    /// [`SprintStore::load_from_storage`] directly to handle it yourself.
    pub fn open(storage: S, seed: SeedData) -> Self {
        Self::open_with_key(storage, STORAGE_KEY, seed)
    }

    pub fn open_with_key(storage: S, key: impl Into<String>, seed: SeedData) -> Self {
        let mut store = Self::new_with_key(storage, key, seed);
        match store.load_from_storage() {
            Ok(LoadOutcome::Loaded) => {}
            Ok(LoadOutcome::Missing) => {
                debug!(key = %store.key, "no persisted snapshot, starting from seed data");
            }
            Err(err) => {
                warn!(key = %store.key, error = %err, "persisted snapshot unreadable, keeping seed data");
            }
        }
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn seed(&self) -> &SeedData {
        &self.seed
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn engineers(&self) -> &[Engineer] {
        &self.engineers
    }

    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Recomputed from the current collections on every call.
    pub fn stats(&self) -> Stats {
        Stats::compute(&self.sprints, &self.engineers)
    }

    pub fn task_stats(&self) -> TaskStats {
        TaskStats::compute(&self.tasks)
    }

    pub fn last_ids(&self) -> IdCounters {
        self.last_ids
    }

    pub fn find_task(&self, task_id: i32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn find_engineer(&self, engineer_id: i32) -> Option<&Engineer> {
        self.engineers.iter().find(|e| e.id == engineer_id)
    }

    pub fn find_sprint(&self, sprint_id: i32) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.id == sprint_id)
    }

    pub fn find_holiday(&self, holiday_id: i32) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.id == holiday_id)
    }

    /// Display name for a sprint id, falling back to the seed's name table
    /// for sprints that are no longer in the collection.
    pub fn sprint_name(&self, sprint_id: i32) -> Option<&str> {
        self.find_sprint(sprint_id)
            .map(|s| s.name.as_str())
            .or_else(|| self.seed.sprint_name(sprint_id))
    }

    // Tasks

    pub fn add_task(&mut self, task: NewTask) -> StoreResult<&[Task]> {
        validation::validate_new_task(&task)?;
        let id = issue_id(&mut self.last_ids.task)?;
        self.tasks.push(task.into_task(id));
        debug!(task_id = id, "task added");
        self.persist()?;
        Ok(self.tasks.as_slice())
    }

    /// Merge `patch` into the task with `task_id`. Unknown ids are ignored.
    pub fn update_task(&mut self, task_id: i32, patch: TaskPatch) -> StoreResult<&[Task]> {
        let Some(index) = self.tasks.iter().position(|t| t.id == task_id) else {
            warn!(task_id, "update ignored, no task with this id");
            return Ok(self.tasks.as_slice());
        };
        validation::validate_task_patch(&self.tasks[index], &patch)?;
        patch.apply(&mut self.tasks[index]);
        self.persist()?;
        Ok(self.tasks.as_slice())
    }

    pub fn delete_task(&mut self, task_id: i32) -> StoreResult<&[Task]> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        if self.tasks.len() == before {
            warn!(task_id, "delete ignored, no task with this id");
            return Ok(self.tasks.as_slice());
        }
        self.persist()?;
        Ok(self.tasks.as_slice())
    }

    /// Move a task one step along its workflow.
    ///
    /// Returns the new status, or `None` when the task is missing or
    /// already completed.
    pub fn advance_task(&mut self, task_id: i32) -> StoreResult<Option<TaskStatus>> {
        let Some(task) = self.find_task(task_id) else {
            warn!(task_id, "advance ignored, no task with this id");
            return Ok(None);
        };
        let Some(next) = task.status.next() else {
            return Ok(None);
        };
        self.update_task(task_id, TaskPatch::status(next))?;
        Ok(Some(next))
    }

    // Engineers

    pub fn add_engineer(&mut self, engineer: NewEngineer) -> StoreResult<&[Engineer]> {
        validation::validate_new_engineer(&engineer)?;
        let id = issue_id(&mut self.last_ids.engineer)?;
        self.engineers.push(engineer.into_engineer(id));
        debug!(engineer_id = id, "engineer added");
        self.persist()?;
        Ok(self.engineers.as_slice())
    }

    pub fn update_engineer(
        &mut self,
        engineer_id: i32,
        patch: EngineerPatch,
    ) -> StoreResult<&[Engineer]> {
        let Some(index) = self.engineers.iter().position(|e| e.id == engineer_id) else {
            warn!(engineer_id, "update ignored, no engineer with this id");
            return Ok(self.engineers.as_slice());
        };
        validation::validate_engineer_patch(&self.engineers[index], &patch)?;
        patch.apply(&mut self.engineers[index]);
        self.persist()?;
        Ok(self.engineers.as_slice())
    }

    pub fn delete_engineer(&mut self, engineer_id: i32) -> StoreResult<&[Engineer]> {
        let before = self.engineers.len();
        self.engineers.retain(|e| e.id != engineer_id);
        if self.engineers.len() == before {
            warn!(engineer_id, "delete ignored, no engineer with this id");
            return Ok(self.engineers.as_slice());
        }
        self.persist()?;
        Ok(self.engineers.as_slice())
    }

    // Sprints

    pub fn add_sprint(&mut self, sprint: NewSprint) -> StoreResult<&[Sprint]> {
        validation::validate_new_sprint(&sprint)?;
        let id = issue_id(&mut self.last_ids.sprint)?;
        self.sprints.push(sprint.into_sprint(id));
        debug!(sprint_id = id, "sprint added");
        self.persist()?;
        Ok(self.sprints.as_slice())
    }

    pub fn update_sprint(&mut self, sprint_id: i32, patch: SprintPatch) -> StoreResult<&[Sprint]> {
        let Some(index) = self.sprints.iter().position(|s| s.id == sprint_id) else {
            warn!(sprint_id, "update ignored, no sprint with this id");
            return Ok(self.sprints.as_slice());
        };
        validation::validate_sprint_patch(&self.sprints[index], &patch)?;
        patch.apply(&mut self.sprints[index]);
        self.persist()?;
        Ok(self.sprints.as_slice())
    }

    /// Tasks that reference the sprint keep their `sprint_id`.
    pub fn delete_sprint(&mut self, sprint_id: i32) -> StoreResult<&[Sprint]> {
        let before = self.sprints.len();
        self.sprints.retain(|s| s.id != sprint_id);
        if self.sprints.len() == before {
            warn!(sprint_id, "delete ignored, no sprint with this id");
            return Ok(self.sprints.as_slice());
        }
        self.persist()?;
        Ok(self.sprints.as_slice())
    }

    // Holidays

    pub fn add_holiday(&mut self, holiday: NewHoliday) -> StoreResult<&[Holiday]> {
        validation::validate_new_holiday(&holiday)?;
        let id = issue_id(&mut self.last_ids.holiday)?;
        self.holidays.push(holiday.into_holiday(id));
        debug!(holiday_id = id, "holiday added");
        self.persist()?;
        Ok(self.holidays.as_slice())
    }

    pub fn update_holiday(
        &mut self,
        holiday_id: i32,
        patch: HolidayPatch,
    ) -> StoreResult<&[Holiday]> {
        let Some(index) = self.holidays.iter().position(|h| h.id == holiday_id) else {
            warn!(holiday_id, "update ignored, no holiday with this id");
            return Ok(self.holidays.as_slice());
        };
        validation::validate_holiday_patch(&self.holidays[index], &patch)?;
        patch.apply(&mut self.holidays[index]);
        self.persist()?;
        Ok(self.holidays.as_slice())
    }

    pub fn delete_holiday(&mut self, holiday_id: i32) -> StoreResult<&[Holiday]> {
        let before = self.holidays.len();
        self.holidays.retain(|h| h.id != holiday_id);
        if self.holidays.len() == before {
            warn!(holiday_id, "delete ignored, no holiday with this id");
            return Ok(self.holidays.as_slice());
        }
        self.persist()?;
        Ok(self.holidays.as_slice())
    }

    // Whole-state operations

    /// Replace every collection with the seed data and persist it.
    ///
    /// Id counters keep their values, so ids issued before the reset are
    /// never handed out again.
    pub fn reset_data(&mut self) -> PersistenceResult<()> {
        self.tasks = self.seed.tasks.clone();
        self.engineers = self.seed.engineers.clone();
        self.sprints = self.seed.sprints.clone();
        self.holidays = self.seed.holidays.clone();
        self.last_ids = self.last_ids.merge(IdCounters::observed(
            &self.tasks,
            &self.engineers,
            &self.sprints,
            &self.holidays,
        ));
        info!("store reset to seed data");
        self.persist()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            tasks: self.tasks.clone(),
            engineers: self.engineers.clone(),
            sprints: self.sprints.clone(),
            holidays: self.holidays.clone(),
            stats: self.stats(),
            last_ids: self.last_ids,
        }
    }

    /// Write the full state under the store's key.
    pub fn persist(&self) -> PersistenceResult<()> {
        let json = self.snapshot().to_json()?;
        self.storage.set(&self.key, &json)?;
        debug!(key = %self.key, bytes = json.len(), "snapshot persisted");
        Ok(())
    }

    /// Replace the in-memory state with the stored snapshot, if any.
    ///
    /// On error the in-memory state is left exactly as it was.
    pub fn load_from_storage(&mut self) -> PersistenceResult<LoadOutcome> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(LoadOutcome::Missing);
        };
        let snapshot = Snapshot::from_json(&raw)?;
        if snapshot.version < SNAPSHOT_VERSION {
            info!(
                version = snapshot.version,
                "loading legacy snapshot layout"
            );
        }
        self.apply_snapshot(snapshot);
        info!(
            key = %self.key,
            tasks = self.tasks.len(),
            engineers = self.engineers.len(),
            sprints = self.sprints.len(),
            holidays = self.holidays.len(),
            "snapshot loaded"
        );
        Ok(LoadOutcome::Loaded)
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let observed = IdCounters::observed(
            &snapshot.tasks,
            &snapshot.engineers,
            &snapshot.sprints,
            &snapshot.holidays,
        );
        self.tasks = snapshot.tasks;
        self.engineers = snapshot.engineers;
        self.sprints = snapshot.sprints;
        self.holidays = snapshot.holidays;
        self.last_ids = snapshot.last_ids.merge(observed);
    }
}
