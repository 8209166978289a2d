use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Blocked => "Blocked",
        }
    }

    /// Forward step of the task workflow.
    ///
    /// `todo -> in_progress -> completed`, with `blocked` re-entering at
    /// `todo`. Completed tasks are terminal.
    pub fn next(self) -> Option<TaskStatus> {
        match self {
            TaskStatus::Todo => Some(TaskStatus::InProgress),
            TaskStatus::InProgress => Some(TaskStatus::Completed),
            TaskStatus::Completed => None,
            TaskStatus::Blocked => Some(TaskStatus::Todo),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(format!("unknown task status '{other}'")),
        }
    }
}

/// Members of the team that tasks can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assignee {
    Keerthi,
    Arpit,
    Pure,
}

impl Assignee {
    pub const ALL: [Assignee; 3] = [Assignee::Keerthi, Assignee::Arpit, Assignee::Pure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Assignee::Keerthi => "Keerthi",
            Assignee::Arpit => "Arpit",
            Assignee::Pure => "Pure",
        }
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Assignee {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Assignee::ALL
            .into_iter()
            .find(|assignee| assignee.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown assignee '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assignee: Assignee,
    pub status: TaskStatus,
    pub sprint_id: i32,
    #[serde(default)]
    pub story_points: u32,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

/// A task as submitted for creation; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assignee: Assignee,
    pub status: TaskStatus,
    pub sprint_id: i32,
    #[serde(default)]
    pub story_points: u32,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, assignee: Assignee, sprint_id: i32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assignee,
            status: TaskStatus::Todo,
            sprint_id,
            story_points: 0,
            tech_stack: Vec::new(),
        }
    }

    pub(crate) fn into_task(self, id: i32) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            assignee: self.assignee,
            status: self.status,
            sprint_id: self.sprint_id,
            story_points: self.story_points,
            tech_stack: self.tech_stack,
        }
    }
}

/// Partial update for a task. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<Assignee>,
    pub status: Option<TaskStatus>,
    pub sprint_id: Option<i32>,
    pub story_points: Option<u32>,
    pub tech_stack: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(sprint_id) = self.sprint_id {
            task.sprint_id = sprint_id;
        }
        if let Some(story_points) = self.story_points {
            task.story_points = story_points;
        }
        if let Some(tech_stack) = self.tech_stack {
            task.tech_stack = tech_stack;
        }
    }
}
