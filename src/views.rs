//! Pure computations over the store's collections.
//!
//! Nothing here touches the store; every function takes the slices it needs
//! and returns borrowed or freshly computed values.

use crate::calendar::WorkCalendar;
use crate::engineer::Engineer;
use crate::holiday::{Holiday, HolidayType};
use crate::sprint::{Sprint, SprintStatus};
use crate::stats::TaskStats;
use crate::task::{Assignee, Task, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use crate::calendar::working_days;

/// `available_days * capacity / 100`.
pub fn allocated_days(available_days: f64, capacity: u32) -> f64 {
    available_days * f64::from(capacity) / 100.0
}

/// Mean capacity across `engineers`, or 0.0 for an empty team.
pub fn average_capacity(engineers: &[Engineer]) -> f64 {
    if engineers.is_empty() {
        return 0.0;
    }
    let total: f64 = engineers.iter().map(|e| f64::from(e.capacity)).sum();
    total / engineers.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacitySummary {
    pub average_capacity: f64,
    pub total_available_days: f64,
    pub total_allocated_days: f64,
}

pub fn capacity_summary(engineers: &[Engineer]) -> CapacitySummary {
    CapacitySummary {
        average_capacity: average_capacity(engineers),
        total_available_days: engineers.iter().map(|e| e.available_days).sum(),
        total_allocated_days: engineers.iter().map(Engineer::allocated_days).sum(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityLevel {
    Healthy,
    High,
    Overloaded,
}

impl CapacityLevel {
    pub fn for_capacity(capacity: u32) -> Self {
        match capacity {
            90.. => CapacityLevel::Overloaded,
            75..=89 => CapacityLevel::High,
            _ => CapacityLevel::Healthy,
        }
    }
}

/// Next status in the task workflow, or `None` once completed.
pub fn status_transition(current: TaskStatus) -> Option<TaskStatus> {
    current.next()
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    TaskStats::compute(tasks)
}

/// Sprint working days minus the holidays that fall on weekdays inside it.
pub fn net_working_days(sprint: &Sprint, holidays: &[Holiday]) -> i64 {
    WorkCalendar::with_holidays(holidays).count_working_days(sprint.start_date, sprint.end_date)
}

/// A field filter where `All` matches every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

pub trait ItemFilter<T> {
    fn matches(&self, item: &T) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Filter<TaskStatus>,
    pub assignee: Filter<Assignee>,
}

impl ItemFilter<Task> for TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        self.status.matches(&task.status) && self.assignee.matches(&task.assignee)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SprintFilter {
    pub status: Filter<SprintStatus>,
}

impl ItemFilter<Sprint> for SprintFilter {
    fn matches(&self, sprint: &Sprint) -> bool {
        self.status.matches(&sprint.status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HolidayFilter {
    pub holiday_type: Filter<HolidayType>,
}

impl ItemFilter<Holiday> for HolidayFilter {
    fn matches(&self, holiday: &Holiday) -> bool {
        self.holiday_type.matches(&holiday.holiday_type)
    }
}

/// Items accepted by `filter`, in input order.
pub fn filter_by<'a, T, F>(items: &'a [T], filter: &F) -> Vec<&'a T>
where
    F: ItemFilter<T> + ?Sized,
{
    items.iter().filter(|item| filter.matches(*item)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<'a, T> {
    /// e.g. "January 2024"
    pub label: String,
    pub items: Vec<&'a T>,
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Group items by calendar month.
///
/// Groups are ordered by first appearance and items keep their input order,
/// so a date-sorted input yields date-sorted groups.
pub fn group_by_month<'a, T, F>(items: &'a [T], date_of: F) -> Vec<MonthGroup<'a, T>>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut groups: Vec<MonthGroup<'a, T>> = Vec::new();
    for item in items {
        let label = month_label(date_of(item));
        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.items.push(item),
            None => groups.push(MonthGroup {
                label,
                items: vec![item],
            }),
        }
    }
    groups
}

/// Items sorted ascending by date; ties keep input order.
pub fn sorted_by_date<'a, T, F>(items: &'a [T], date_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| date_of(*item));
    sorted
}

/// Items dated on or after `reference`, earliest first, at most `limit`.
pub fn upcoming<'a, T, F>(
    items: &'a [T],
    date_of: F,
    reference: NaiveDate,
    limit: usize,
) -> Vec<&'a T>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut selected: Vec<&T> = items
        .iter()
        .filter(|item| date_of(*item) >= reference)
        .collect();
    selected.sort_by_key(|item| date_of(*item));
    selected.truncate(limit);
    selected
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayEvents<'a> {
    pub date: NaiveDate,
    pub sprints_starting: Vec<&'a Sprint>,
    pub holidays: Vec<&'a Holiday>,
}

impl DayEvents<'_> {
    pub fn is_empty(&self) -> bool {
        self.sprints_starting.is_empty() && self.holidays.is_empty()
    }
}

/// What a calendar cell shows for `date`: sprints that start and holidays
/// that fall on it.
pub fn events_on<'a>(
    date: NaiveDate,
    sprints: &'a [Sprint],
    holidays: &'a [Holiday],
) -> DayEvents<'a> {
    DayEvents {
        date,
        sprints_starting: sprints.iter().filter(|s| s.start_date == date).collect(),
        holidays: holidays.iter().filter(|h| h.date == date).collect(),
    }
}
