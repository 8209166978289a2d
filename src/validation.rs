use crate::engineer::{Engineer, EngineerPatch, NewEngineer};
use crate::holiday::{Holiday, HolidayPatch, NewHoliday};
use crate::sprint::{NewSprint, Sprint, SprintPatch};
use crate::task::{NewTask, Task, TaskPatch};
use chrono::NaiveDate;
use thiserror::Error;

const MAX_CAPACITY: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{field} is required")));
    }
    Ok(())
}

fn check_capacity(capacity: u32) -> Result<(), ValidationError> {
    if capacity > MAX_CAPACITY {
        return Err(ValidationError::new(format!(
            "capacity must be between 0 and {MAX_CAPACITY} (got {capacity})"
        )));
    }
    Ok(())
}

fn check_available_days(days: f64) -> Result<(), ValidationError> {
    if !days.is_finite() || days < 0.0 {
        return Err(ValidationError::new(format!(
            "available days must be a non-negative number (got {days})"
        )));
    }
    Ok(())
}

fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::new(format!(
            "sprint end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

pub fn validate_new_task(task: &NewTask) -> Result<(), ValidationError> {
    require_text("task title", &task.title)
}

pub fn validate_task_patch(current: &Task, patch: &TaskPatch) -> Result<(), ValidationError> {
    require_text("task title", patch.title.as_deref().unwrap_or(&current.title))
}

pub fn validate_new_engineer(engineer: &NewEngineer) -> Result<(), ValidationError> {
    require_text("engineer name", &engineer.name)?;
    require_text("engineer role", &engineer.role)?;
    check_capacity(engineer.capacity)?;
    check_available_days(engineer.available_days)
}

pub fn validate_engineer_patch(
    current: &Engineer,
    patch: &EngineerPatch,
) -> Result<(), ValidationError> {
    require_text("engineer name", patch.name.as_deref().unwrap_or(&current.name))?;
    require_text("engineer role", patch.role.as_deref().unwrap_or(&current.role))?;
    check_capacity(patch.capacity.unwrap_or(current.capacity))?;
    check_available_days(patch.available_days.unwrap_or(current.available_days))
}

pub fn validate_new_sprint(sprint: &NewSprint) -> Result<(), ValidationError> {
    require_text("sprint name", &sprint.name)?;
    check_date_range(sprint.start_date, sprint.end_date)
}

/// Checks the sprint as it would look after the patch, so moving only one
/// end of the range is still caught.
pub fn validate_sprint_patch(current: &Sprint, patch: &SprintPatch) -> Result<(), ValidationError> {
    require_text("sprint name", patch.name.as_deref().unwrap_or(&current.name))?;
    check_date_range(
        patch.start_date.unwrap_or(current.start_date),
        patch.end_date.unwrap_or(current.end_date),
    )
}

pub fn validate_new_holiday(holiday: &NewHoliday) -> Result<(), ValidationError> {
    require_text("holiday name", &holiday.name)
}

pub fn validate_holiday_patch(
    current: &Holiday,
    patch: &HolidayPatch,
) -> Result<(), ValidationError> {
    require_text("holiday name", patch.name.as_deref().unwrap_or(&current.name))
}

/// Checks a stored task against the rules applied when it was created.
pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    require_text("task title", &task.title)
}

pub fn validate_engineer(engineer: &Engineer) -> Result<(), ValidationError> {
    require_text("engineer name", &engineer.name)?;
    require_text("engineer role", &engineer.role)?;
    check_capacity(engineer.capacity)?;
    check_available_days(engineer.available_days)
}

pub fn validate_sprint(sprint: &Sprint) -> Result<(), ValidationError> {
    require_text("sprint name", &sprint.name)?;
    check_date_range(sprint.start_date, sprint.end_date)
}

pub fn validate_holiday(holiday: &Holiday) -> Result<(), ValidationError> {
    require_text("holiday name", &holiday.name)
}
