use crate::engineer::Engineer;
use crate::sprint::{Sprint, SprintStatus};
use crate::task::{Task, TaskStatus};
use crate::views::average_capacity;
use serde::{Deserialize, Serialize};

/// Dashboard headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_sprints: usize,
    pub active_sprints: usize,
    pub total_engineers: usize,
    /// Mean engineer capacity, rounded to a whole percent.
    pub planned_capacity: u32,
}

impl Stats {
    pub fn compute(sprints: &[Sprint], engineers: &[Engineer]) -> Self {
        let planned = average_capacity(engineers).round();
        Self {
            total_sprints: sprints.len(),
            active_sprints: sprints
                .iter()
                .filter(|sprint| sprint.status == SprintStatus::Active)
                .count(),
            total_engineers: engineers.len(),
            // capacities are 0..=100 so the mean always fits
            planned_capacity: planned.clamp(0.0, 100.0) as u32,
        }
    }
}

/// Task counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub blocked: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[Task]) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Blocked => stats.blocked += 1,
            }
        }
        stats
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "total={}, todo={}, in_progress={}, completed={}, blocked={}",
            self.total, self.todo, self.in_progress, self.completed, self.blocked
        )
    }
}
