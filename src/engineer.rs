use crate::views::allocated_days;
use serde::{Deserialize, Serialize};

/// A team member and the share of their time planned for sprint work.
///
/// `allocated_days` is not stored; it is derived from `available_days` and
/// `capacity` on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engineer {
    pub id: i32,
    pub name: String,
    /// Free-form role, e.g. "Backend Engineer".
    pub role: String,
    /// Percentage of available time allocated to planned work (0-100).
    pub capacity: u32,
    pub available_days: f64,
}

impl Engineer {
    pub fn allocated_days(&self) -> f64 {
        allocated_days(self.available_days, self.capacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEngineer {
    pub name: String,
    pub role: String,
    pub capacity: u32,
    pub available_days: f64,
}

impl NewEngineer {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            capacity: 100,
            available_days: 10.0,
        }
    }

    pub(crate) fn into_engineer(self, id: i32) -> Engineer {
        Engineer {
            id,
            name: self.name,
            role: self.role,
            capacity: self.capacity,
            available_days: self.available_days,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineerPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub capacity: Option<u32>,
    pub available_days: Option<f64>,
}

impl EngineerPatch {
    pub(crate) fn apply(self, engineer: &mut Engineer) {
        if let Some(name) = self.name {
            engineer.name = name;
        }
        if let Some(role) = self.role {
            engineer.role = role;
        }
        if let Some(capacity) = self.capacity {
            engineer.capacity = capacity;
        }
        if let Some(available_days) = self.available_days {
            engineer.available_days = available_days;
        }
    }
}
