use super::{PersistenceError, PersistenceResult};
use crate::engineer::Engineer;
use crate::holiday::Holiday;
use crate::sprint::Sprint;
use crate::stats::Stats;
use crate::store::IdCounters;
use crate::task::Task;
use crate::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};

/// Newest snapshot layout this build writes and reads.
///
/// Version 0 is the unversioned legacy record (tasks, engineers, sprints,
/// stats) with no holidays or id counters.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The full persisted state of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    pub tasks: Vec<Task>,
    pub engineers: Vec<Engineer>,
    pub sprints: Vec<Sprint>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Written for readers of the raw record; recomputed on load.
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub last_ids: IdCounters,
}

impl Snapshot {
    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(input: &str) -> PersistenceResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(input)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> PersistenceResult<()> {
        check_unique("task", self.tasks.iter().map(|t| t.id))?;
        check_unique("engineer", self.engineers.iter().map(|e| e.id))?;
        check_unique("sprint", self.sprints.iter().map(|s| s.id))?;
        check_unique("holiday", self.holidays.iter().map(|h| h.id))?;
        check_records("task", &self.tasks, |t| t.id, validation::validate_task)?;
        check_records(
            "engineer",
            &self.engineers,
            |e| e.id,
            validation::validate_engineer,
        )?;
        check_records("sprint", &self.sprints, |s| s.id, validation::validate_sprint)?;
        check_records(
            "holiday",
            &self.holidays,
            |h| h.id,
            validation::validate_holiday,
        )?;
        Ok(())
    }
}

/// Stored records must satisfy the same rules the store's mutators enforce.
fn check_records<T>(
    kind: &str,
    records: &[T],
    id_of: impl Fn(&T) -> i32,
    validate: impl Fn(&T) -> Result<(), ValidationError>,
) -> PersistenceResult<()> {
    for record in records {
        validate(record).map_err(|err| {
            PersistenceError::InvalidData(format!("{kind} {}: {err}", id_of(record)))
        })?;
    }
    Ok(())
}

fn check_unique(kind: &str, ids: impl Iterator<Item = i32>) -> PersistenceResult<()> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate {kind} id {id}"
            )));
        }
    }
    Ok(())
}
