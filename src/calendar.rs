use crate::holiday::Holiday;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Count weekdays (Mon-Fri) in the inclusive range `[start, end]`.
///
/// Returns 0 when `end` precedes `start`.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> i64 {
    WorkCalendar::default().count_working_days(start, end)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    // (month, day) pairs that are off in every year
    recurring: HashSet<(u32, u32)>,
    non_working_days: HashSet<Weekday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            holidays: HashSet::new(),
            recurring: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Mon-Fri calendar that also blocks the given holidays.
    pub fn with_holidays(holidays: &[Holiday]) -> Self {
        let mut calendar = Self::default();
        for holiday in holidays {
            calendar.add_holiday(holiday);
        }
        calendar
    }

    /// Block a holiday. Recurring holidays block the same month/day in every year.
    pub fn add_holiday(&mut self, holiday: &Holiday) {
        if holiday.recurring {
            self.recurring
                .insert((holiday.date.month(), holiday.date.day()));
        } else {
            self.holidays.insert(holiday.date);
        }
    }

    pub fn add_date(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Set custom working days (e.g., Mon-Sat for 6-day weeks)
    pub fn set_working_days(&mut self, days: &[Weekday]) {
        self.non_working_days.clear();
        for day in Self::ALL_WEEKDAYS {
            if !days.contains(&day) {
                self.non_working_days.insert(day);
            }
        }
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday())
            && !self.holidays.contains(&date)
            && !self.recurring.contains(&(date.month(), date.day()))
    }

    /// Find the next working day strictly after `from`.
    ///
    /// Returns `None` when the calendar has no working weekday or the search
    /// runs off the end of the supported date range.
    pub fn next_working_day(&self, from: NaiveDate) -> Option<NaiveDate> {
        if self.non_working_days.len() == Self::ALL_WEEKDAYS.len() {
            return None;
        }
        let mut current = from.checked_add_days(Days::new(1))?;
        while !self.is_working_day(current) {
            current = current.checked_add_days(Days::new(1))?;
        }
        Some(current)
    }

    /// Get all working days in a date range
    pub fn working_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_working_day(*day))
            .collect()
    }

    /// Count working days in a date range
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        for day in start.iter_days().take_while(|day| *day <= end) {
            if self.is_working_day(day) {
                count += 1;
            }
        }
        count
    }
}
