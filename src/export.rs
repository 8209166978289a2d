//! One-way export of the store's current state.
//!
//! Exported documents carry the derived values (`allocatedDays`,
//! `workingDays`) so downstream readers need not recompute them. Nothing
//! here can be read back into a store.

use crate::engineer::Engineer;
use crate::persistence::{KeyValueStore, PersistenceResult};
use crate::sprint::Sprint;
use crate::stats::Stats;
use crate::store::SprintStore;
use crate::task::Task;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_EXPORT_FILE: &str = "project-data.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerRecord<'a> {
    #[serde(flatten)]
    pub engineer: &'a Engineer,
    pub allocated_days: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintRecord<'a> {
    #[serde(flatten)]
    pub sprint: &'a Sprint,
    pub working_days: i64,
}

#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub tasks: &'a [Task],
    pub engineers: Vec<EngineerRecord<'a>>,
    pub sprints: Vec<SprintRecord<'a>>,
    pub stats: Stats,
}

impl<'a> ExportDocument<'a> {
    pub fn from_store<S: KeyValueStore>(store: &'a SprintStore<S>) -> Self {
        Self {
            tasks: store.tasks(),
            engineers: store
                .engineers()
                .iter()
                .map(|engineer| EngineerRecord {
                    engineer,
                    allocated_days: engineer.allocated_days(),
                })
                .collect(),
            sprints: store
                .sprints()
                .iter()
                .map(|sprint| SprintRecord {
                    sprint,
                    working_days: sprint.working_days(),
                })
                .collect(),
            stats: store.stats(),
        }
    }

    pub fn to_json_pretty(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn export_to_json<S, P>(store: &SprintStore<S>, path: P) -> PersistenceResult<()>
where
    S: KeyValueStore,
    P: AsRef<Path>,
{
    let document = ExportDocument::from_store(store);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &document)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct TaskCsvRecord<'a> {
    id: i32,
    title: &'a str,
    description: &'a str,
    assignee: &'static str,
    status: &'static str,
    sprint_id: i32,
    sprint_name: &'a str,
    story_points: u32,
    tech_stack: String,
}

impl<'a> TaskCsvRecord<'a> {
    fn new(task: &'a Task, sprint_name: Option<&'a str>) -> Self {
        Self {
            id: task.id,
            title: &task.title,
            description: &task.description,
            assignee: task.assignee.as_str(),
            status: task.status.as_str(),
            sprint_id: task.sprint_id,
            sprint_name: sprint_name.unwrap_or_default(),
            story_points: task.story_points,
            tech_stack: task.tech_stack.join(";"),
        }
    }
}

/// Write one CSV row per task, with the sprint's display name resolved.
pub fn write_tasks_csv<S, W>(store: &SprintStore<S>, writer: W) -> PersistenceResult<()>
where
    S: KeyValueStore,
    W: Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for task in store.tasks() {
        writer.serialize(TaskCsvRecord::new(task, store.sprint_name(task.sprint_id)))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_tasks_to_csv<S, P>(store: &SprintStore<S>, path: P) -> PersistenceResult<()>
where
    S: KeyValueStore,
    P: AsRef<Path>,
{
    let file = File::create(path)?;
    write_tasks_csv(store, file)
}
