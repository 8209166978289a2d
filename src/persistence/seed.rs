use super::PersistenceResult;
use crate::engineer::Engineer;
use crate::holiday::Holiday;
use crate::sprint::Sprint;
use crate::stats::Stats;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BUNDLED_SEED: &str = include_str!("../../data/seed.json");

/// The default dataset a store starts from and returns to on reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub tasks: Vec<Task>,
    pub engineers: Vec<Engineer>,
    pub sprints: Vec<Sprint>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub upcoming_sprints: Vec<Sprint>,
    /// Sprint display names keyed by the sprint id as a string.
    #[serde(default)]
    pub sprint_names: BTreeMap<String, String>,
}

impl SeedData {
    /// The dataset shipped with the crate (`data/seed.json`).
    pub fn bundled() -> PersistenceResult<Self> {
        Self::from_json(BUNDLED_SEED)
    }

    pub fn from_json(input: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// A seed with no records at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sprint_name(&self, sprint_id: i32) -> Option<&str> {
        self.sprint_names
            .get(&sprint_id.to_string())
            .map(String::as_str)
    }
}
