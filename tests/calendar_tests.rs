use chrono::{NaiveDate, Weekday, Datelike};
use sprint_planner::calendar::{WorkCalendar, working_days};
use sprint_planner::{Holiday, HolidayType};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn holiday(id: i32, date: NaiveDate, recurring: bool) -> Holiday {
    Holiday {
        id,
        name: format!("Holiday {id}"),
        date,
        holiday_type: HolidayType::Company,
        description: None,
        recurring,
    }
}

#[test]
fn two_week_sprint_has_ten_working_days() {
    // 2024-01-08 is a Monday, 2024-01-19 a Friday
    assert_eq!(working_days(d(2024, 1, 8), d(2024, 1, 19)), 10);
}

#[test]
fn single_day_ranges_count_weekdays_only() {
    assert_eq!(working_days(d(2024, 1, 8), d(2024, 1, 8)), 1);
    assert_eq!(working_days(d(2024, 1, 13), d(2024, 1, 13)), 0);
    assert_eq!(working_days(d(2024, 1, 13), d(2024, 1, 14)), 0);
}

#[test]
fn range_starting_and_ending_on_weekends() {
    // Sat 2024-01-06 .. Sun 2024-01-14 covers one full working week
    assert_eq!(working_days(d(2024, 1, 6), d(2024, 1, 14)), 5);
}

#[test]
fn reversed_range_has_no_working_days() {
    assert_eq!(working_days(d(2024, 1, 19), d(2024, 1, 8)), 0);
}

#[test]
fn range_across_year_boundary() {
    // Mon 2024-12-30 .. Fri 2025-01-03
    assert_eq!(working_days(d(2024, 12, 30), d(2025, 1, 3)), 5);
}

#[test]
fn range_across_leap_day() {
    // Mon 2024-02-26 .. Fri 2024-03-01, with Thu 2024-02-29 in between
    assert_eq!(working_days(d(2024, 2, 26), d(2024, 3, 1)), 5);
    assert_eq!(working_days(d(2024, 2, 29), d(2024, 2, 29)), 1);
    // 2023 has no Feb 29: Mon 2023-02-27 .. Fri 2023-03-03
    assert_eq!(working_days(d(2023, 2, 27), d(2023, 3, 3)), 5);
    // February 2024 has 21 weekdays, one more than February 2023
    assert_eq!(working_days(d(2024, 2, 1), d(2024, 2, 29)), 21);
    assert_eq!(working_days(d(2023, 2, 1), d(2023, 2, 28)), 20);
}

#[test]
fn dated_holiday_removes_a_working_day() {
    let cal = WorkCalendar::with_holidays(&[holiday(1, d(2024, 1, 10), false)]);
    assert!(!cal.is_working_day(d(2024, 1, 10)));
    assert_eq!(cal.count_working_days(d(2024, 1, 8), d(2024, 1, 19)), 9);
    // a one-off holiday does not repeat
    assert!(cal.is_working_day(d(2025, 1, 10)));
}

#[test]
fn weekend_holiday_does_not_change_the_count() {
    let cal = WorkCalendar::with_holidays(&[holiday(1, d(2024, 1, 13), false)]);
    assert_eq!(cal.count_working_days(d(2024, 1, 8), d(2024, 1, 19)), 10);
}

#[test]
fn recurring_holiday_blocks_same_day_every_year() {
    let cal = WorkCalendar::with_holidays(&[holiday(1, d(2024, 1, 15), true)]);
    assert!(!cal.is_working_day(d(2024, 1, 15)));
    // 2025-01-15 is a Wednesday
    assert_eq!(d(2025, 1, 15).weekday(), Weekday::Wed);
    assert!(!cal.is_working_day(d(2025, 1, 15)));
    assert!(cal.is_working_day(d(2025, 1, 16)));
}

#[test]
fn next_working_day_skips_weekend_and_holiday() {
    let cal = WorkCalendar::with_holidays(&[holiday(1, d(2024, 1, 15), false)]);
    let next = cal.next_working_day(d(2024, 1, 12)).unwrap();
    assert_eq!(next, d(2024, 1, 16));
    assert_eq!(next.weekday(), Weekday::Tue);
}

#[test]
fn six_day_week_counts_saturdays() {
    let mut cal = WorkCalendar::default();
    cal.set_working_days(&[
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]);
    assert_eq!(cal.count_working_days(d(2024, 1, 8), d(2024, 1, 14)), 6);
}

#[test]
fn calendar_without_working_weekdays_has_no_next_day() {
    let mut cal = WorkCalendar::default();
    cal.set_working_days(&[]);
    assert_eq!(cal.next_working_day(d(2024, 1, 8)), None);
}

#[test]
fn working_days_in_range_lists_dates_in_order() {
    let mut cal = WorkCalendar::default();
    cal.add_date(d(2024, 1, 9));
    let days = cal.working_days_in_range(d(2024, 1, 8), d(2024, 1, 12));
    assert_eq!(
        days,
        vec![d(2024, 1, 8), d(2024, 1, 10), d(2024, 1, 11), d(2024, 1, 12)]
    );
}
